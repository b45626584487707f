use std::fs::{File, OpenOptions};
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::error::{ImportError, Result};

/// Handles that can be cut to a length and flushed to durable storage
pub trait Truncate {
    fn truncate(&mut self, len: u64) -> io::Result<()>;

    fn sync(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Truncate for File {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }

    fn sync(&mut self) -> io::Result<()> {
        self.sync_all()
    }
}

impl Truncate for Cursor<Vec<u8>> {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.get_mut().truncate(len as usize);
        Ok(())
    }
}

/// The single open handle on the HCL file being reconciled.
///
/// Read once, appended to, rewound and overwritten. The handle is released
/// when the value is dropped; `close` additionally reports flush errors.
pub struct PlanFile<H = File> {
    path: PathBuf,
    handle: H,
}

impl PlanFile<File> {
    /// Open for read and write, creating the file when missing
    pub fn open(path: &Path) -> Result<Self> {
        let handle = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| ImportError::io(path, e))?;

        log::debug!("Opened plan file {}", path.display());
        Ok(Self::from_handle(path, handle))
    }
}

impl<H: Read + Write + Seek + Truncate> PlanFile<H> {
    pub fn from_handle(path: &Path, handle: H) -> Self {
        Self {
            path: path.to_path_buf(),
            handle,
        }
    }

    /// Entire current contents
    pub fn read_to_string(&mut self) -> Result<String> {
        let mut content = String::new();
        self.handle
            .seek(SeekFrom::Start(0))
            .and_then(|_| self.handle.read_to_string(&mut content))
            .map_err(|e| self.error(e))?;
        Ok(content)
    }

    /// Write `text` after the current end of file
    pub fn append(&mut self, text: &str) -> Result<()> {
        self.handle
            .seek(SeekFrom::End(0))
            .and_then(|_| self.handle.write_all(text.as_bytes()))
            .and_then(|_| self.handle.flush())
            .map_err(|e| self.error(e))
    }

    /// Replace the whole file with `text`
    pub fn overwrite(&mut self, text: &str) -> Result<()> {
        let len = text.len() as u64;
        self.handle
            .seek(SeekFrom::Start(0))
            .and_then(|_| self.handle.write_all(text.as_bytes()))
            .and_then(|_| self.handle.truncate(len))
            .and_then(|_| self.handle.flush())
            .map_err(|e| self.error(e))
    }

    /// Flush and sync, then release the handle
    pub fn close(mut self) -> Result<()> {
        self.handle
            .flush()
            .and_then(|_| self.handle.sync())
            .map_err(|e| self.error(e))?;
        log::debug!("Closed plan file {}", self.path.display());
        Ok(())
    }

    fn error(&self, source: io::Error) -> ImportError {
        ImportError::io(&self.path, source)
    }
}

#[cfg(test)]
impl PlanFile<Cursor<Vec<u8>>> {
    /// In-memory plan file holding `content`
    pub fn in_memory(content: &str) -> Self {
        Self::from_handle(Path::new("main.tf"), Cursor::new(content.as_bytes().to_vec()))
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(self.handle.get_ref()).into_owned()
    }
}
