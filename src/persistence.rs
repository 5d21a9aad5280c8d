use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{NetErr, Result, arch::Network};

/// Version of the snapshot layout written by `Network::save`.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    network: &'a Network,
}

#[derive(Deserialize)]
struct Snapshot {
    version: u32,
    network: serde_json::Value,
}

impl Network {
    /// Writes the full state of the network to `sink` as a versioned JSON snapshot.
    ///
    /// Every weight, momentum and hyperparameter is written with enough digits to be read back
    /// exactly. A network holding NaN or infinite values (a diverged training run) is refused with
    /// `NetErr::NonFiniteState` and nothing is written.
    pub fn save<W: Write>(&self, mut sink: W) -> Result<()> {
        self.check_finite()?;

        let snapshot = SnapshotRef {
            version: SNAPSHOT_VERSION,
            network: self,
        };

        serde_json::to_writer(&mut sink, &snapshot)?;
        sink.flush()?;
        Ok(())
    }

    /// Reads a network previously written by `save`.
    ///
    /// # Returns
    /// The decoded network or an error if the source couldn't be read, was written by another
    /// snapshot version or holds matrices that don't fit its layers.
    pub fn load<R: Read>(source: R) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_reader(source)?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(NetErr::UnsupportedVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }

        let net: Network = serde_json::from_value(snapshot.network)?;
        net.check_shapes()?;
        Ok(net)
    }

    /// Saves the network into the file at `path`, creating or truncating it.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        self.save(BufWriter::new(file))?;

        debug!("saved network to {}", path.display());
        Ok(())
    }

    /// Loads a network from the file at `path`.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let net = Self::load(BufReader::new(file))?;

        debug!("loaded network from {}", path.display());
        Ok(net)
    }
}
