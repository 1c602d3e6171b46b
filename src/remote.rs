//! Exchanging animations with the cube device.
//!
//! The actual wire protocol lives behind [`CubeTransport`], supplied
//! by the host. This module owns what travels over it: encoded
//! containers going up, decoded animations coming down, and the
//! plain-text listing format.

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Animation, AnimationKind};
use crate::raster::{self, RasterError};

/// Failure reported by a transport implementation.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Errors from device exchange operations.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("animation must be named before sending")]
    MissingName,

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Raster(#[from] RasterError),
}

/// One row of the device's animation listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    pub name: String,
    pub id: String,
    /// Encoded size in bytes, when the device reports one.
    pub size: Option<u64>,
}

impl RemoteEntry {
    /// Stored animations report a positive size; built-in programmatic
    /// ones report zero or nothing.
    pub fn kind(&self) -> AnimationKind {
        match self.size {
            Some(size) if size > 0 => AnimationKind::Fixed,
            _ => AnimationKind::Programmatic,
        }
    }
}

/// The device connection, implemented by the host (HTTP in production).
pub trait CubeTransport {
    /// Store encoded bytes under `name`, returning the assigned id.
    fn upload(&mut self, name: &str, bytes: &[u8]) -> Result<String, TransportError>;

    /// Fetch the encoded bytes of a stored animation.
    fn download(&mut self, id: &str) -> Result<Vec<u8>, TransportError>;

    /// Remove a stored animation.
    fn delete(&mut self, id: &str) -> Result<(), TransportError>;

    /// List the animations on the device.
    fn list(&mut self) -> Result<Vec<RemoteEntry>, TransportError>;
}

/// Parse the device's listing body: one `name,id,size` line per
/// animation. Lines without exactly three fields are skipped; an
/// unparseable size becomes `None`.
pub fn parse_listing(body: &str) -> Vec<RemoteEntry> {
    body.lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.split(',').collect();
            if parts.len() != 3 {
                return None;
            }
            Some(RemoteEntry {
                name: parts[0].trim().to_string(),
                id: parts[1].trim().to_string(),
                size: parts[2].trim().parse().ok(),
            })
        })
        .collect()
}

/// Encode `animation` and upload it under its name.
///
/// The animation must carry a non-empty name. On success the returned
/// id is also stamped onto the animation, marking it in sync with the
/// device copy until the next edit.
pub fn send_animation<T: CubeTransport>(
    transport: &mut T,
    animation: &mut Animation,
) -> Result<String, RemoteError> {
    let name = match animation.name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return Err(RemoteError::MissingName),
    };

    let bytes = raster::encode(animation)?;
    let id = transport.upload(&name, &bytes)?;
    info!("uploaded '{name}' as id {id}");
    animation.set_id(Some(id.clone()));
    Ok(id)
}

/// Download and decode the animation a listing entry points at.
///
/// The result carries the entry's name and id verbatim.
pub fn fetch_animation<T: CubeTransport>(
    transport: &mut T,
    entry: &RemoteEntry,
) -> Result<Animation, RemoteError> {
    let bytes = transport.download(&entry.id)?;
    let mut animation = raster::decode(&bytes, None)?;
    animation.name = Some(entry.name.clone());
    animation.set_id(Some(entry.id.clone()));
    info!("fetched '{}' ({} frames)", entry.name, animation.frame_count());
    Ok(animation)
}
