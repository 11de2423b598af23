//! Generate command implementation.

use advuuid_format::Format;

/// Runs the generate command.
pub fn run(format: Option<&str>, count: usize) -> Result<(), Box<dyn std::error::Error>> {
    let format = Format::parse_optional(format)?;
    tracing::debug!(?format, count, "generating values");

    for _ in 0..count {
        println!("{}", format.generate());
    }
    Ok(())
}
