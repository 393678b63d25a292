//! CSV export for the per-hour simulation trace.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::HourRecord;

/// Schema v1 column header for CSV trace export.
const HEADER: &str = "timestep,time_hr,wind_mw,reliq_mw,cooling_mw,hb_chain_mw,\
                      ro_mw,el_stack_mw,used_mw,curtailed_mwh,h2_soc_kg,nh3_soc_t,\
                      water_soc_m3,nh3_prod_t,ship_loaded_t,h2_spill_kg,ro_make_m3,\
                      water_need_m3,water_short_m3";

/// Exports the simulation trace to a CSV file at the given path.
///
/// Writes a header row followed by one data row per hour using the schema v1
/// column layout. Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(trace: &[HourRecord], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(trace, buf)
}

/// Writes the simulation trace as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(trace: &[HourRecord], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in trace {
        wtr.write_record(&[
            r.timestep.to_string(),
            format!("{:.2}", r.time_hr),
            format!("{:.4}", r.wind_mw),
            format!("{:.4}", r.reliq_mw),
            format!("{:.4}", r.cooling_mw),
            format!("{:.4}", r.hb_chain_mw),
            format!("{:.4}", r.ro_mw),
            format!("{:.4}", r.el_stack_mw),
            format!("{:.4}", r.used_mw),
            format!("{:.4}", r.curtailed_mwh),
            format!("{:.4}", r.h2_soc_kg),
            format!("{:.4}", r.nh3_soc_t),
            format!("{:.4}", r.water_soc_m3),
            format!("{:.4}", r.nh3_prod_t),
            format!("{:.4}", r.ship_loaded_t),
            format!("{:.4}", r.h2_spill_kg),
            format!("{:.4}", r.ro_make_m3),
            format!("{:.4}", r.water_need_m3),
            format!("{:.4}", r.water_short_m3),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
