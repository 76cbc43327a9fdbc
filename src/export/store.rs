use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use chrono::{LocalResult, TimeZone, Utc};
use sha2::{Digest, Sha256};

use crate::export::row::{encode_row, header_line};
use crate::export::ExportError;
use crate::session::record::SessionRecord;

const LOCK_RETRY_ATTEMPTS: u32 = 50;
const LOCK_RETRY_DELAY_MS: u64 = 10;
const DIGEST_PREFIX_CHARS: usize = 12;

#[derive(Debug, Clone)]
pub struct SubmissionStore {
    export_root: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedRow {
    pub results_path: PathBuf,
    pub drawing_paths: [String; 2],
    pub submission_time: String,
}

impl SubmissionStore {
    pub fn new(export_root: impl Into<PathBuf>) -> Self {
        Self {
            export_root: export_root.into(),
        }
    }

    pub fn export_root(&self) -> &Path {
        &self.export_root
    }

    pub fn results_path(&self) -> PathBuf {
        self.export_root.join("results.csv")
    }

    fn lock_path(&self) -> PathBuf {
        self.export_root.join("results.lock")
    }

    fn drawings_dir(&self) -> PathBuf {
        self.export_root.join("drawings")
    }

    pub fn append_submission(
        &self,
        record: &SessionRecord,
        now: i64,
    ) -> Result<SubmittedRow, ExportError> {
        fs::create_dir_all(&self.export_root).map_err(|err| io_err(&self.export_root, err))?;
        let submission_time = render_submission_time(now)?;
        let drawing_paths = self.stage_drawing_artifacts(record)?;
        let line = encode_row(record, &drawing_paths, &submission_time)?;

        let lock = self.acquire_lock()?;
        let appended = self.append_line(&line);
        drop(lock);
        appended?;

        Ok(SubmittedRow {
            results_path: self.results_path(),
            drawing_paths,
            submission_time,
        })
    }

    // Header presence is decided under the lock so the first-ever export
    // writes it exactly once even with concurrent sessions.
    fn append_line(&self, line: &str) -> Result<(), ExportError> {
        let path = self.results_path();
        let header_needed = match fs::metadata(&path) {
            Ok(metadata) => metadata.len() == 0,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => true,
            Err(err) => return Err(io_err(&path, err)),
        };
        let mut body = String::new();
        if header_needed {
            body.push_str(&header_line());
            body.push('\n');
        }
        body.push_str(line);
        body.push('\n');

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|err| io_err(&path, err))?;
        file.write_all(body.as_bytes())
            .map_err(|err| io_err(&path, err))?;
        file.sync_all().map_err(|err| io_err(&path, err))?;
        Ok(())
    }

    fn acquire_lock(&self) -> Result<LockGuard, ExportError> {
        let path = self.lock_path();
        for _ in 0..LOCK_RETRY_ATTEMPTS {
            match fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&path)
            {
                Ok(mut file) => {
                    let _ = file.write_all(std::process::id().to_string().as_bytes());
                    return Ok(LockGuard { path });
                }
                Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                    thread::sleep(Duration::from_millis(LOCK_RETRY_DELAY_MS));
                }
                Err(err) => return Err(io_err(&path, err)),
            }
        }
        Err(ExportError::LockBusy {
            path: path.display().to_string(),
        })
    }

    fn stage_drawing_artifacts(
        &self,
        record: &SessionRecord,
    ) -> Result<[String; 2], ExportError> {
        let dir = self.drawings_dir();
        fs::create_dir_all(&dir).map_err(|err| io_err(&dir, err))?;
        let mut relative_paths = [String::new(), String::new()];
        for slot in 0..2 {
            let Some(drawing) = record.drawings[slot].as_ref() else {
                return Err(ExportError::Encode(format!(
                    "record is missing drawing {}",
                    slot + 1
                )));
            };
            let digest = Sha256::digest(&drawing.pixel_data);
            let digest_hex: String = digest.iter().map(|byte| format!("{byte:02x}")).collect();
            let filename = format!(
                "{}_{}_{}.png",
                sanitize_filename_component(record.participant_id.as_str()),
                slot + 1,
                &digest_hex[..DIGEST_PREFIX_CHARS]
            );
            let path = dir.join(&filename);
            write_artifact(&path, &drawing.pixel_data)?;
            relative_paths[slot] = format!("drawings/{filename}");
        }
        Ok(relative_paths)
    }
}

#[derive(Debug)]
struct LockGuard {
    path: PathBuf,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

fn write_artifact(path: &Path, content: &[u8]) -> Result<(), ExportError> {
    // Artifact names are content-addressed; an existing file already holds
    // the same bytes.
    if path.exists() {
        return Ok(());
    }
    let parent = path
        .parent()
        .ok_or_else(|| io_err(path, std::io::Error::other("artifact path has no parent")))?;
    let tmp_name = format!(
        ".{}.tmp-{}",
        path.file_name().and_then(|v| v.to_str()).unwrap_or("artifact"),
        std::process::id(),
    );
    let tmp_path = parent.join(tmp_name);
    {
        let mut file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp_path)
            .map_err(|err| io_err(&tmp_path, err))?;
        file.write_all(content).map_err(|err| io_err(&tmp_path, err))?;
        file.sync_all().map_err(|err| io_err(&tmp_path, err))?;
    }
    fs::rename(&tmp_path, path).map_err(|err| io_err(&tmp_path, err))?;
    Ok(())
}

fn render_submission_time(now: i64) -> Result<String, ExportError> {
    match Utc.timestamp_opt(now, 0) {
        LocalResult::Single(timestamp) => Ok(timestamp.format("%Y-%m-%dT%H:%M:%SZ").to_string()),
        _ => Err(ExportError::Encode(format!(
            "invalid submission timestamp {now}"
        ))),
    }
}

fn sanitize_filename_component(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn io_err(path: &Path, source: std::io::Error) -> ExportError {
    ExportError::Io {
        path: path.display().to_string(),
        source,
    }
}
