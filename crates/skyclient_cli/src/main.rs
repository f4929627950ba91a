//! CLI entry point.
//!
//! # Responsibility
//! - Decode a query-protocol XML response (file or stdin) and print the
//!   decoded record.
//! - Keep output deterministic so responses can be diffed.
//!
//! # Invariants
//! - Exit status 0 on success, 1 when the input cannot be read or decoded,
//!   2 on usage errors.

use log::{error, info};
use skyclient_core::transform::autoscaling::DescribePoliciesResultUnmarshaller;
use skyclient_core::transform::elasticbeanstalk::CreateStorageLocationResultUnmarshaller;
use skyclient_core::transform::metadata::ResponseMetadataUnmarshaller;
use skyclient_core::{core_version, init_logging, unmarshall_str, UnmarshallError};
use std::fs;
use std::io::{self, Read, Write};

const USAGE: &str =
    "usage: skyclient <storage-location|describe-policies|response-metadata> [file]\n       skyclient --version";
const LOG_DIR_ENV: &str = "SKYCLIENT_LOG_DIR";
const LOG_LEVEL_ENV: &str = "SKYCLIENT_LOG_LEVEL";

const EXIT_OK: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_USAGE: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    StorageLocation,
    DescribePolicies,
    ResponseMetadata,
}

impl Shape {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "storage-location" => Some(Self::StorageLocation),
            "describe-policies" => Some(Self::DescribePolicies),
            "response-metadata" => Some(Self::ResponseMetadata),
            _ => None,
        }
    }

    fn decode(self, xml: &str) -> Result<String, UnmarshallError> {
        match self {
            Self::StorageLocation => {
                unmarshall_str(xml, &CreateStorageLocationResultUnmarshaller).map(|r| r.to_string())
            }
            Self::DescribePolicies => {
                unmarshall_str(xml, &DescribePoliciesResultUnmarshaller).map(|r| r.to_string())
            }
            Self::ResponseMetadata => {
                unmarshall_str(xml, &ResponseMetadataUnmarshaller).map(|r| r.to_string())
            }
        }
    }
}

fn main() {
    if let Ok(log_dir) = std::env::var(LOG_DIR_ENV) {
        let level = std::env::var(LOG_LEVEL_ENV)
            .unwrap_or_else(|_| skyclient_core::default_log_level().to_string());
        if let Err(err) = init_logging(&level, &log_dir) {
            eprintln!("skyclient: logging disabled: {err}");
        }
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let stdout = io::stdout();
    let stderr = io::stderr();
    let code = run(&args, io::stdin().lock(), &mut stdout.lock(), &mut stderr.lock());
    std::process::exit(code);
}

fn run(args: &[String], stdin: impl Read, out: &mut impl Write, err: &mut impl Write) -> i32 {
    let (shape_name, path) = match args {
        [flag] if flag == "--version" => {
            let _ = writeln!(out, "skyclient {}", core_version());
            return EXIT_OK;
        }
        [shape] => (shape.as_str(), None),
        [shape, path] => (shape.as_str(), Some(path.as_str())),
        _ => {
            let _ = writeln!(err, "{USAGE}");
            return EXIT_USAGE;
        }
    };
    let Some(shape) = Shape::parse(shape_name) else {
        let _ = writeln!(err, "skyclient: unknown shape `{shape_name}`\n{USAGE}");
        return EXIT_USAGE;
    };

    let xml = match read_input(path, stdin) {
        Ok(xml) => xml,
        Err(read_err) => {
            error!(
                "event=read_input module=cli status=error path={} error={}",
                path.unwrap_or("-"),
                read_err
            );
            let _ = writeln!(err, "skyclient: cannot read input: {read_err}");
            return EXIT_FAILURE;
        }
    };

    match shape.decode(&xml) {
        Ok(rendered) => {
            info!("event=decode module=cli status=ok shape={}", shape_name);
            let _ = writeln!(out, "{rendered}");
            EXIT_OK
        }
        Err(decode_err) => {
            error!(
                "event=decode module=cli status=error shape={} error={}",
                shape_name, decode_err
            );
            let _ = writeln!(err, "skyclient: cannot decode {shape_name}: {decode_err}");
            EXIT_FAILURE
        }
    }
}

fn read_input(path: Option<&str>, mut stdin: impl Read) -> io::Result<String> {
    match path {
        Some("-") | None => {
            let mut xml = String::new();
            stdin.read_to_string(&mut xml)?;
            Ok(xml)
        }
        Some(path) => fs::read_to_string(path),
    }
}

#[cfg(test)]
mod tests {
    use super::{run, EXIT_FAILURE, EXIT_OK, EXIT_USAGE};

    fn invoke(args: &[&str], stdin: &str) -> (i32, String, String) {
        let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(&args, stdin.as_bytes(), &mut out, &mut err);
        (
            code,
            String::from_utf8(out).expect("utf8 stdout"),
            String::from_utf8(err).expect("utf8 stderr"),
        )
    }

    #[test]
    fn decodes_storage_location_from_stdin() {
        let (code, out, _) = invoke(
            &["storage-location"],
            "<CreateStorageLocationResponse><CreateStorageLocationResult><S3Bucket>elasticbeanstalk-us-east-1-1234</S3Bucket></CreateStorageLocationResult></CreateStorageLocationResponse>",
        );
        assert_eq!(code, EXIT_OK);
        assert_eq!(out, "{S3Bucket: elasticbeanstalk-us-east-1-1234}\n");
    }

    #[test]
    fn malformed_input_exits_with_failure() {
        let (code, out, err) = invoke(&["describe-policies"], "<A><B></A>");
        assert_eq!(code, EXIT_FAILURE);
        assert!(out.is_empty());
        assert!(err.contains("cannot decode describe-policies"));
    }

    #[test]
    fn usage_errors_exit_with_two() {
        assert_eq!(invoke(&[], "").0, EXIT_USAGE);
        assert_eq!(invoke(&["unknown-shape"], "").0, EXIT_USAGE);
        assert_eq!(invoke(&["a", "b", "c"], "").0, EXIT_USAGE);
    }

    #[test]
    fn version_flag_prints_core_version() {
        let (code, out, _) = invoke(&["--version"], "");
        assert_eq!(code, EXIT_OK);
        assert!(out.starts_with("skyclient "));
    }
}
