use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::info;

use crate::protocol::SimulationResult;

pub const GEOJSON_FILE_NAME: &str = "isochrones.geojson";
pub const GEOJSON_MEDIA_TYPE: &str = "application/geo+json";
pub const REPORT_FILE_NAME: &str = "feucast_report.pdf";
pub const REPORT_MEDIA_TYPE: &str = "application/pdf";

/// A file offered to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl Download {
    /// The last simulation result, serialized verbatim.
    pub fn geojson(result: &SimulationResult) -> Result<Self, serde_json::Error> {
        Ok(Self {
            file_name: GEOJSON_FILE_NAME.to_string(),
            media_type: GEOJSON_MEDIA_TYPE.to_string(),
            bytes: serde_json::to_vec(result.raw())?,
        })
    }

    pub fn report(pdf: Vec<u8>) -> Self {
        Self {
            file_name: REPORT_FILE_NAME.to_string(),
            media_type: REPORT_MEDIA_TYPE.to_string(),
            bytes: pdf,
        }
    }

    /// Writes the file into `dir`, replacing any previous file of that name.
    pub async fn save_into(&self, dir: &Path) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, &self.bytes).await?;
        info!(path = %path.display(), bytes = self.bytes.len(), "saved download");
        Ok(path)
    }
}

/// Encodes PNG bytes as a `data:` URL.
pub fn png_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}
