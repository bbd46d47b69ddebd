use crate::assemble::labels::Labels;
use color_print::{cformat, cprintln};

const BYTES_PER_ROW: usize = 16;

/// Hex listing of the main stream. Values that will not serialize are shown in red.
pub fn dump_items(items: &[i64]) {
    println!("+--------+------------------------------------------------");
    for (row, chunk) in items.chunks(BYTES_PER_ROW).enumerate() {
        let cells: Vec<String> = chunk
            .iter()
            .map(|&val| match u8::try_from(val) {
                Ok(byte) => format!("{:02X}", byte),
                Err(_) => cformat!("<r,s>{}</>", val),
            })
            .collect();
        println!("| 0x{:04X} | {}", row * BYTES_PER_ROW, cells.join(" "));
    }
    println!("+--------+------------------------------------------------");
}

pub fn dump_labels(labels: &Labels) {
    println!("+-[Labels]-----------------+-----------------------------");
    for (name, value) in labels.iter() {
        cprintln!("| <g>{:24}</> | {:>6} (0x{:X})", name, value, value);
    }
    println!("+--------------------------+-----------------------------");
}
