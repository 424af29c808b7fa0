use ebcdic_dbcs::Substitution;

use crate::cli::{OutputFormat, TableArgs};
use crate::shared::load_codec;

fn substitution_str(sub: &Substitution) -> String {
    let sbcs = sub.sbcs.map(|b| format!("0x{b:02X}"));
    let dbcs = sub.dbcs.map(|[l, t]| format!("0x{l:02X}{t:02X}"));
    match (sbcs, dbcs) {
        (Some(s), Some(d)) => format!("{s} / {d}"),
        (Some(s), None) => s,
        (None, Some(d)) => d,
        (None, None) => "none".to_string(),
    }
}

pub fn run(table: &TableArgs, format: &OutputFormat) -> Result<(), i32> {
    let codec = load_codec(table, Default::default())?;
    let stats = codec.stats();
    let d = codec.decode_table().params();
    let e = codec.encode_table().params();

    match format {
        OutputFormat::Text => {
            println!("Name: {}", codec.name());
            match codec.ccsid() {
                Some(ccsid) => println!("CCSID: {ccsid}"),
                None => println!("CCSID: unknown"),
            }
            println!("Substitution: {}", substitution_str(codec.substitution()));
            println!("Decode:");
            println!("  Params: {:#06x}/{:#06x}/{}", d.mask1, d.mask2, d.shift);
            println!("  SBCS mapped: {}", stats.sbcs_mapped);
            println!("  DBCS mapped: {}", stats.dbcs_mapped);
            println!("  index1: {}", stats.decode_index1_len);
            println!("  index2: {} ({} blocks)", stats.decode_index2_len, stats.decode_blocks);
            println!("Encode:");
            println!("  Params: {:#06x}/{:#06x}/{}", e.mask1, e.mask2, e.shift);
            println!("  Encodable: {}", stats.encodable);
            println!("  index1: {}", stats.encode_index1_len);
            println!("  index2: {} ({} blocks)", stats.encode_index2_len, stats.encode_blocks);
            println!("  index2a: {}", stats.encode_index2a_len);
        }
        OutputFormat::Json => {
            let obj = serde_json::json!({
                "name": codec.name(),
                "ccsid": codec.ccsid(),
                "substitution": codec.substitution(),
                "decode_params": d,
                "encode_params": e,
                "stats": stats,
            });
            println!("{}", serde_json::to_string_pretty(&obj).unwrap());
        }
    }
    Ok(())
}
