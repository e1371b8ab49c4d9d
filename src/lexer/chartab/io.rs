// src/lexer/chartab/io.rs
use std::{
    io::{BufWriter, Write},
    path::Path,
    time::Instant,
};

use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use super::{N_BYTES, PackedCharTab};

// -------------------- JSON (de)serialization --------------------

#[serde_as]
#[derive(Serialize, Deserialize)]
struct PackedDisk {
    class_mask: u8,
    #[serde_as(as = "[_; 256]")]
    flags: [u8; N_BYTES],
}
impl From<&PackedCharTab> for PackedDisk {
    fn from(t: &PackedCharTab) -> Self {
        Self {
            class_mask: t.class_mask,
            flags: t.flags,
        }
    }
}
impl PackedDisk {
    fn into_packed(self) -> PackedCharTab {
        PackedCharTab {
            flags: self.flags,
            class_mask: self.class_mask,
        }
    }
}

pub fn save_packed_json(path: &Path, t: &PackedCharTab) -> std::io::Result<()> {
    let f = std::fs::File::create(path)?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, &PackedDisk::from(t))?;
    w.flush()
}

pub fn load_packed_json_bytes(data: &[u8]) -> Result<PackedCharTab, String> {
    serde_json::from_slice::<PackedDisk>(data)
        .map(|d| d.into_packed())
        .map_err(|e| format!("Failed to parse char table JSON: {e}"))
}

// -------------------- Compact binary --------------------
//   magic: 8 bytes = "CHRTAB01"
//   u32:   class mask (LE)
//   u8:    flags[256]

const BIN_MAGIC: &[u8; 8] = b"CHRTAB01";
const BIN_LEN: usize = 8 + 4 + N_BYTES;

pub fn save_packed_bin(path: &Path, t: &PackedCharTab) -> std::io::Result<()> {
    let instant = Instant::now();
    let f = std::fs::File::create(path)?;
    let mut w = BufWriter::new(f);

    w.write_all(BIN_MAGIC)?;
    w.write_all(&(t.class_mask as u32).to_le_bytes())?;
    w.write_all(&t.flags)?;

    let flush = w.flush();
    log::debug!(
        "Saved packed char table to {} in {} us",
        path.display(),
        instant.elapsed().as_micros()
    );
    flush
}

pub fn load_packed_bin_bytes(data: &[u8]) -> Result<PackedCharTab, String> {
    if data.len() < BIN_LEN {
        return Err(format!(
            "char table bin too short: {} bytes, need {BIN_LEN}",
            data.len()
        ));
    }
    if &data[..8] != BIN_MAGIC {
        return Err("bad magic in char table .bin".into());
    }

    let mut le = [0u8; 4];
    le.copy_from_slice(&data[8..12]);
    let class_mask = u8::try_from(u32::from_le_bytes(le))
        .map_err(|_| "class mask does not fit in a byte".to_string())?;

    let mut flags = [0u8; N_BYTES];
    flags.copy_from_slice(&data[12..BIN_LEN]);

    Ok(PackedCharTab { flags, class_mask })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PackedCharTab {
        let mut flags = [0u8; N_BYTES];
        for (i, f) in flags.iter_mut().enumerate() {
            *f = (i as u8).wrapping_mul(37);
        }
        PackedCharTab {
            flags,
            class_mask: 7,
        }
    }

    #[test]
    fn bin_file_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chartab.bin");
        save_packed_bin(&path, &sample()).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), BIN_LEN);
        assert_eq!(load_packed_bin_bytes(&bytes).unwrap(), sample());
    }

    #[test]
    fn json_file_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chartab.json");
        save_packed_json(&path, &sample()).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(load_packed_json_bytes(&bytes).unwrap(), sample());
    }

    #[test]
    fn bin_rejects_malformed_input() {
        assert!(load_packed_bin_bytes(b"CHRTAB01").unwrap_err().contains("too short"));

        let mut bad = vec![0u8; BIN_LEN];
        bad[..8].copy_from_slice(b"LXTBLE01");
        assert!(load_packed_bin_bytes(&bad).unwrap_err().contains("magic"));

        let mut wide = vec![0u8; BIN_LEN];
        wide[..8].copy_from_slice(BIN_MAGIC);
        wide[8..12].copy_from_slice(&0x1_00u32.to_le_bytes());
        assert!(load_packed_bin_bytes(&wide).is_err());
    }

    #[test]
    fn json_rejects_short_flag_array() {
        let err = load_packed_json_bytes(br#"{"class_mask":7,"flags":[0,1,2]}"#).unwrap_err();
        assert!(err.starts_with("Failed to parse char table JSON"));
    }
}
