//! CLI response types and the human-readable summary format.

use std::io::{self, Write};

use declkit_core::output::{ErrorInfo, SCHEMA_VERSION};
use declkit_swift::model::DeclarationKind;
use declkit_swift::ParameterDescriptor;
use serde::Serialize;

use crate::scan::{ScanReport, ScannedFile};

/// Response for `declkit scan`.
#[derive(Debug, Serialize)]
pub struct ScanResponse<'a> {
    /// "ok" unless every scanned file failed.
    pub status: String,
    pub schema_version: String,
    pub files: &'a [ScannedFile],
    pub errors: Vec<ErrorInfo>,
}

impl<'a> ScanResponse<'a> {
    pub fn new(report: &'a ScanReport) -> Self {
        let status = if report.all_failed() { "error" } else { "ok" };
        ScanResponse {
            status: status.to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            files: &report.files,
            errors: report.errors.iter().map(ErrorInfo::from_error).collect(),
        }
    }
}

/// Response for `declkit signature`.
#[derive(Debug, Serialize)]
pub struct SignatureResponse<'a> {
    pub status: String,
    pub schema_version: String,
    pub descriptor: &'a ParameterDescriptor,
}

impl<'a> SignatureResponse<'a> {
    pub fn new(descriptor: &'a ParameterDescriptor) -> Self {
        SignatureResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            descriptor,
        }
    }
}

/// One line per file with non-zero counts, then one line per error.
pub fn write_scan_summary(report: &ScanReport, writer: &mut impl Write) -> io::Result<()> {
    for file in &report.files {
        let counts: Vec<String> = DeclarationKind::ALL
            .iter()
            .filter_map(|kind| {
                let n = file.declarations.count(*kind);
                (n > 0).then(|| format!("{} {}", n, kind))
            })
            .collect();
        if counts.is_empty() {
            writeln!(writer, "{}: no declarations", file.path)?;
        } else {
            writeln!(writer, "{}: {}", file.path, counts.join(", "))?;
        }
    }
    for error in &report.errors {
        writeln!(writer, "error: {}", error)?;
    }
    writeln!(
        writer,
        "{} files, {} declarations, {} errors",
        report.files.len(),
        report.declaration_count(),
        report.errors.len()
    )
}

/// Indented tree of a descriptor and its nested lists.
pub fn write_descriptor_summary(
    descriptor: &ParameterDescriptor,
    writer: &mut impl Write,
) -> io::Result<()> {
    write_descriptor(descriptor, 0, writer)
}

fn write_descriptor(
    descriptor: &ParameterDescriptor,
    depth: usize,
    writer: &mut impl Write,
) -> io::Result<()> {
    let indent = "  ".repeat(depth);
    let optional = if descriptor.is_optional() { " optional" } else { "" };
    writeln!(
        writer,
        "{}{} {}{}",
        indent,
        descriptor.kind_str(),
        descriptor,
        optional
    )?;
    match descriptor {
        ParameterDescriptor::Standard(standard) => {
            for parameter in &standard.parameters {
                write_descriptor(parameter, depth + 1, writer)?;
            }
        }
        ParameterDescriptor::Tuple(tuple) => {
            for argument in &tuple.arguments {
                write_descriptor(argument, depth + 1, writer)?;
            }
        }
        ParameterDescriptor::Closure(closure) => {
            let mut effects = Vec::new();
            if closure.is_async {
                effects.push("async");
            }
            if closure.is_throwing {
                effects.push("throws");
            }
            if closure.is_escaping {
                effects.push("escaping");
            } else if closure.is_auto_escaping {
                effects.push("auto-escaping");
            }
            if !effects.is_empty() {
                writeln!(writer, "{}  [{}]", indent, effects.join(" "))?;
            }
            writeln!(writer, "{}  inputs {}", indent, closure.raw_input())?;
            for input in &closure.inputs {
                write_descriptor(input, depth + 2, writer)?;
            }
            writeln!(writer, "{}  outputs {}", indent, closure.raw_output())?;
            for output in &closure.outputs {
                write_descriptor(output, depth + 2, writer)?;
            }
        }
    }
    Ok(())
}
