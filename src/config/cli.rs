use crate::core::Storage;
use crate::utils::error::Result;
use std::path::Path;

/// Filesystem storage. Reads resolve against the working directory so the
/// sample sheet can live anywhere; writes land under `base_path`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let data = tokio::fs::read(path).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_output_directory() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("nested/output");
        let storage = LocalStorage::new(base.to_str().unwrap().to_string());

        storage.write_file("protocol.csv", b"SampleID").await.unwrap();

        let written = std::fs::read(base.join("protocol.csv")).unwrap();
        assert_eq!(written, b"SampleID");
    }

    #[tokio::test]
    async fn test_read_uses_given_path() {
        let temp_dir = TempDir::new().unwrap();
        let sheet = temp_dir.path().join("samples.csv");
        std::fs::write(&sheet, "SampleID,Concentration (ng/µL)\nA1,40").unwrap();

        let storage = LocalStorage::new("unused".to_string());
        let data = storage.read_file(sheet.to_str().unwrap()).await.unwrap();

        assert!(String::from_utf8(data).unwrap().ends_with("A1,40"));
    }

    #[tokio::test]
    async fn test_read_missing_file_fails() {
        let storage = LocalStorage::new("unused".to_string());
        assert!(storage.read_file("does/not/exist.csv").await.is_err());
    }
}
