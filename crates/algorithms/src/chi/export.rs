//! CSV export of the global node table
//!
//! One row per node, located through the collaborator's coordinate
//! lookup. The writer owns the serialized format; downstream plotting
//! tools expect exactly this header and nine-digit precision.

use std::io::Write;

use log::warn;
use riverchi_core::{FlowNetwork, GlobalNodeTable, Result};

/// Column header of the exported table
pub const CSV_HEADER: &str = "latitude,longitude,chi,elevation,m_chi,b_chi";

/// Serialize a node table as comma-separated text.
///
/// Rows follow ascending node id. Nodes the collaborator cannot locate
/// are skipped with a warning.
pub fn write_chi_csv<N, W>(table: &GlobalNodeTable, network: &N, mut out: W) -> Result<()>
where
    N: FlowNetwork,
    W: Write,
{
    writeln!(out, "{}", CSV_HEADER)?;

    for (node, stat) in table.iter() {
        let Some((latitude, longitude)) = network.node_to_geo(node) else {
            warn!("node {} has no geographic location, row skipped", node);
            continue;
        };

        writeln!(
            out,
            "{:.9},{:.9},{:.9},{:.9},{:.9},{:.9}",
            latitude, longitude, stat.chi, stat.elevation, stat.m_chi, stat.b_chi
        )?;
    }

    Ok(())
}
