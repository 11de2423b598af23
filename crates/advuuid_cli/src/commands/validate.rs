//! Validate command implementation.

/// Runs the validate command; an invalid value is an error.
pub fn run(format: Option<&str>, value: &str) -> Result<(), Box<dyn std::error::Error>> {
    if advuuid_format::validate(format, Some(value)) {
        println!("valid");
        Ok(())
    } else {
        println!("invalid");
        Err(format!("{value:?} does not match {}", format.unwrap_or("a v4 UUID")).into())
    }
}
