//! Append-only file journal
//!
//! One journal entry per line: a crc32 of the JSON body, a space, the
//! body. Every append is followed by fsync; acknowledgment before fsync
//! is forbidden. A torn final line can therefore only belong to an append
//! that was never acknowledged, and replay discards it. Corruption
//! anywhere earlier is fatal.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::changelog::ChangeRecord;
use crate::mvcc::Version;

use super::{ControlEvent, DurableSink, JournalEntry, SinkError, SinkResult};

const JOURNAL_FILE: &str = "journal.log";

/// Append-only journal file with checksummed entries.
#[derive(Debug)]
pub struct FileJournal {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileJournal {
    /// Opens or creates `<data_dir>/journal.log`, creating the directory
    /// if needed.
    pub fn open(data_dir: &Path) -> SinkResult<Self> {
        fs::create_dir_all(data_dir)?;
        let path = data_dir.join(JOURNAL_FILE);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Path of the journal file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, entry: &JournalEntry) -> SinkResult<()> {
        let body = serde_json::to_string(entry)
            .map_err(|e| SinkError::AppendFailed(format!("encode: {}", e)))?;
        let line = format!("{:08x} {}\n", crc32fast::hash(body.as_bytes()), body);

        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        file.write_all(line.as_bytes())?;
        // the append is acknowledged only once it is on disk
        file.sync_all()?;
        Ok(())
    }

    fn decode_line(line: &str, number: usize) -> SinkResult<JournalEntry> {
        let (crc_text, body) = line.split_once(' ').ok_or_else(|| SinkError::Corrupt {
            line: number,
            reason: "missing checksum separator".into(),
        })?;
        let expected = u32::from_str_radix(crc_text, 16).map_err(|_| SinkError::Corrupt {
            line: number,
            reason: "unreadable checksum".into(),
        })?;
        let actual = crc32fast::hash(body.as_bytes());
        if actual != expected {
            return Err(SinkError::Corrupt {
                line: number,
                reason: format!("checksum mismatch: expected {:08x}, found {:08x}", expected, actual),
            });
        }
        serde_json::from_str(body).map_err(|e| SinkError::Corrupt {
            line: number,
            reason: format!("undecodable entry: {}", e),
        })
    }
}

impl DurableSink for FileJournal {
    fn append_commit(&self, version: &Version, record: &ChangeRecord) -> SinkResult<()> {
        self.append(&JournalEntry::Commit {
            version: version.clone(),
            record: record.clone(),
        })
    }

    fn append_control(&self, event: &ControlEvent) -> SinkResult<()> {
        self.append(&JournalEntry::Control(event.clone()))
    }

    fn replay(&self) -> SinkResult<Vec<JournalEntry>> {
        let reader = BufReader::new(File::open(&self.path)?);
        let lines: Vec<String> = reader.lines().collect::<Result<_, _>>()?;

        let mut entries = Vec::with_capacity(lines.len());
        let last = lines.len();
        for (index, line) in lines.iter().enumerate() {
            match Self::decode_line(line, index + 1) {
                Ok(entry) => entries.push(entry),
                // a torn final line is an unacknowledged append: drop it
                Err(_) if index + 1 == last => break,
                Err(err) => return Err(err),
            }
        }
        Ok(entries)
    }
}
