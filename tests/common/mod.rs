#![allow(dead_code)]

use std::fs::File;
use std::io::{Error, Write};
use std::path::{Path, PathBuf};

pub const VOICE_HEADER: &str = "phone_number,msg_id,language,requested_on,sent_on,delivery_status,duration,response_value,tag1,tag2,tag3,tag4,tag5,message_attempt,url";
pub const SMS_HEADER: &str = "phone_number,msg_id,delivery_status,Occurrence";
pub const PAYMENT_HEADER: &str = "Phone Number,URL,Amount,Status,Payment Date";
pub const IMPORT_HEADER: &str = "phone_number,id,name,language,tag1,tag2,tag3,tag4,tag5";

pub const EXPECTED_HEADER: &str = "phone_number,name,language,requested_on,sent_on,delivery_status,duration,response_value,tag1,tag2,tag3,tag4,tag5,SMS Status,Clicked,payment_success,payment_failed,Payment Amount";

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Writes `header` followed by `rows` to `dir/name`.
pub fn write_table(dir: &Path, name: &str, header: &str, rows: &[&str]) -> Result<PathBuf, Error> {
    let path = dir.join(name);
    let mut file = File::create(&path)?;
    writeln!(file, "{header}")?;
    for row in rows {
        writeln!(file, "{row}")?;
    }
    Ok(path)
}

/// A reached voice attempt with the given send time and payment link.
pub fn voice_row(phone: &str, msg_id: &str, sent_on: &str, attempt: u32, url: &str) -> String {
    format!("{phone},{msg_id},en,{sent_on},{sent_on},Reached,30,1,loan,,,,,{attempt},{url}")
}
