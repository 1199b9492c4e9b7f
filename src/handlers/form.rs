// Form data processing for Voice Gateway
//
// This module reads the multipart form posted to /transcribe. The uploaded audio is kept
// in memory so it can be re-encoded for the inference backend.

use actix_multipart::{Field, Multipart};
use futures::{StreamExt, TryStreamExt};
use log::debug;

use crate::error::GatewayError;

/// Fields read from a /transcribe form
#[derive(Debug, Default)]
pub struct TranscriptionForm {
    /// First `file` part carrying a filename, as (filename, bytes)
    pub file: Option<(String, Vec<u8>)>,
    /// Value of the `language` field, possibly empty
    pub language: Option<String>,
}

/// Running byte count over every part of the form
struct UploadBudget {
    used: usize,
    limit: usize,
}

impl UploadBudget {
    fn consume(&mut self, len: usize) -> Result<(), GatewayError> {
        self.used += len;
        if self.used > self.limit {
            return Err(GatewayError::FileTooLarge(self.used, self.limit));
        }
        Ok(())
    }
}

/// Extract the audio file and language hint from a multipart form
///
/// # Arguments
///
/// * `form` - The multipart form from the HTTP request
/// * `max_size` - Maximum number of bytes read across all parts
///
/// # Returns
///
/// * `Result<TranscriptionForm, GatewayError>` - Extracted fields, or a form error
pub async fn extract_form_data(
    mut form: Multipart,
    max_size: usize,
) -> Result<TranscriptionForm, GatewayError> {
    let mut budget = UploadBudget {
        used: 0,
        limit: max_size,
    };
    let mut extracted = TranscriptionForm::default();

    while let Some(mut field) = form
        .try_next()
        .await
        .map_err(|e| GatewayError::form_error(e.to_string()))?
    {
        let (field_name, file_name) = match field.content_disposition() {
            Some(cd) => (
                cd.get_name().map(str::to_string).unwrap_or_default(),
                cd.get_filename().map(str::to_string),
            ),
            None => (String::new(), None),
        };

        match (field_name.as_str(), file_name) {
            ("file", Some(file_name)) if extracted.file.is_none() => {
                let data = read_field(&mut field, &mut budget).await?;
                debug!("Received upload {} ({} bytes)", file_name, data.len());
                extracted.file = Some((file_name, data));
            }
            ("language", None) if extracted.language.is_none() => {
                let data = read_field(&mut field, &mut budget).await?;
                let value = String::from_utf8(data).map_err(|_| {
                    GatewayError::form_error("language field is not valid UTF-8")
                })?;
                extracted.language = Some(value);
            }
            _ => {
                // Skip unknown fields, still counting them against the ceiling
                read_field(&mut field, &mut budget).await?;
            }
        }
    }

    Ok(extracted)
}

async fn read_field(field: &mut Field, budget: &mut UploadBudget) -> Result<Vec<u8>, GatewayError> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| GatewayError::form_error(e.to_string()))?;
        budget.consume(chunk.len())?;
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}
