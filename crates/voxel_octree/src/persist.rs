//! Pre-order topology stream.
//!
//! Each node is one fixed-size record, written parent before children and
//! children in corner order:
//!
//! ```text
//! ┌──────┬───────┬──────────┬──────────┬──────────┐
//! │ flag │ depth │ offset x │ offset y │ offset z │
//! │  u8  │  u8   │  u32 LE  │  u32 LE  │  u32 LE  │
//! └──────┴───────┴──────────┴──────────┴──────────┘
//!   flag: 0 = leaf, 1 = eight children follow
//! ```
//!
//! There is no header. Payloads are not part of the format; the `_with`
//! variants let the caller append its own encoding after every record.
//!
//! Reading re-derives every coordinate from the parent and rejects any record
//! that disagrees, so a stream either reproduces the exact topology or fails
//! with [`OctreeError::CorruptTree`]. The tree is only handed back on success.
//! Bytes after the last record are left unread.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::OctreeError;
use crate::octree::{NodeAllocator, NodeId, Octree, OctreeConfig};

/// Size of one node record in bytes.
pub const RECORD_LEN: usize = 14;

const LEAF: u8 = 0;
const BRANCH: u8 = 1;

/// Write the topology of the whole tree.
pub fn write_topology<T, A, W>(tree: &Octree<T, A>, writer: W) -> Result<(), OctreeError>
where
  A: NodeAllocator,
  W: Write,
{
  write_with(tree, writer, |_, _| Ok(()))
}

/// Write the topology, calling `payload` after each record.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "octree::persist::write"))]
pub fn write_with<T, A, W, F>(tree: &Octree<T, A>, mut writer: W, mut payload: F) -> Result<(), OctreeError>
where
  A: NodeAllocator,
  W: Write,
  F: FnMut(&T, &mut W) -> io::Result<()>,
{
  let mut record = [0u8; RECORD_LEN];
  for id in tree.iter_nodes(tree.root()) {
    let (depth, offset) = tree.depth_and_offset(id);
    record[0] = if tree.is_leaf(id) { LEAF } else { BRANCH };
    record[1] = depth;
    for (axis, value) in offset.iter().enumerate() {
      let start = 2 + axis * 4;
      record[start..start + 4].copy_from_slice(&value.to_le_bytes());
    }
    writer.write_all(&record)?;
    payload(tree.data(id), &mut writer)?;
  }
  writer.flush()?;
  Ok(())
}

/// Read a topology written by [`write_topology`]; payloads are defaulted.
pub fn read_topology<T, R>(reader: R, config: OctreeConfig) -> Result<Octree<T>, OctreeError>
where
  T: Default,
  R: Read,
{
  read_with(reader, config, |_| Ok(T::default()))
}

/// Read a topology written by [`write_with`], decoding each payload with
/// `payload` right after its record.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "octree::persist::read"))]
pub fn read_with<T, R, F>(mut reader: R, config: OctreeConfig, mut payload: F) -> Result<Octree<T>, OctreeError>
where
  T: Default,
  R: Read,
  F: FnMut(&mut R) -> io::Result<T>,
{
  let mut tree = Octree::<T>::with_config(config)?;
  let mut pending = vec![tree.root()];
  let mut record = [0u8; RECORD_LEN];

  while let Some(id) = pending.pop() {
    reader.read_exact(&mut record).map_err(truncated)?;
    let expected = tree.coord(id);
    let depth = record[1];
    let offset = [0usize, 1, 2].map(|axis| {
      let start = 2 + axis * 4;
      u32::from_le_bytes([
        record[start],
        record[start + 1],
        record[start + 2],
        record[start + 3],
      ])
    });
    if depth != expected.depth || offset != expected.offset {
      return Err(OctreeError::corrupt(format!(
        "record at depth {depth} offset {offset:?} where depth {} offset {:?} was expected",
        expected.depth, expected.offset
      )));
    }

    *tree.data_mut(id) = payload(&mut reader).map_err(truncated)?;

    match record[0] {
      LEAF => {}
      BRANCH => {
        tree.init_children(id).map_err(|err| match err {
          OctreeError::DepthExceeded { depth, limit } => {
            OctreeError::corrupt(format!("children at depth {depth} exceed the depth limit {limit}"))
          }
          other => other,
        })?;
        push_children(&tree, id, &mut pending);
      }
      flag => return Err(OctreeError::corrupt(format!("invalid presence flag {flag}"))),
    }
  }

  #[cfg(feature = "tracing")]
  tracing::debug!(nodes = tree.nodes(tree.root()), "octree topology read");
  Ok(tree)
}

/// Write the topology to `path`.
pub fn save<T, A: NodeAllocator>(tree: &Octree<T, A>, path: impl AsRef<Path>) -> Result<(), OctreeError> {
  let file = File::create(path)?;
  write_topology(tree, BufWriter::new(file))
}

/// Read a topology from `path`.
pub fn load<T: Default>(path: impl AsRef<Path>, config: OctreeConfig) -> Result<Octree<T>, OctreeError> {
  let file = File::open(path)?;
  read_topology(BufReader::new(file), config)
}

/// Children pushed in reverse so they pop in corner order.
fn push_children<T, A: NodeAllocator>(tree: &Octree<T, A>, id: NodeId, pending: &mut Vec<NodeId>) {
  if let Some(children) = tree.children(id) {
    pending.extend(children.into_iter().rev());
  }
}

fn truncated(err: io::Error) -> OctreeError {
  if err.kind() == io::ErrorKind::UnexpectedEof {
    OctreeError::corrupt("stream ended before the last record")
  } else {
    OctreeError::Io(err)
  }
}

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;
