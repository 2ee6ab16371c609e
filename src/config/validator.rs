//! Configuration validation

use super::*;
use anyhow::Result;

/// Validate complete configuration
pub fn validate_config(config: &DispatchConfig) -> Result<()> {
    validate_inputs(&config.inputs)?;
    validate_impute(&config.impute)?;
    validate_output(&config.output)?;

    Ok(())
}

/// Validate positional inputs
///
/// Only checks that nothing is empty; existence of the reference files is
/// impute2's concern, and the chunk file is opened by each worker.
pub fn validate_inputs(inputs: &InputPaths) -> Result<()> {
    let named = [
        ("chunks file", &inputs.chunks),
        ("map file", &inputs.map),
        ("ref haplotypes file", &inputs.ref_haplotypes),
        ("ref legend file", &inputs.ref_legend),
        ("phased sample haps file", &inputs.sample_haplotypes),
        ("prefix for output files", &inputs.output_prefix),
    ];
    for (name, path) in named {
        if path.as_os_str().is_empty() {
            anyhow::bail!("{} must not be empty", name);
        }
    }

    Ok(())
}

/// Validate impute2 parameters
pub fn validate_impute(impute: &ImputeParams) -> Result<()> {
    if impute.program.trim().is_empty() {
        anyhow::bail!("impute2 program must not be empty");
    }

    if impute.ne == 0 {
        anyhow::bail!("ne must be greater than 0");
    }

    if impute.buffer.trim().is_empty() || impute.buffer.contains(char::is_whitespace) {
        anyhow::bail!("buffer must be a single non-empty token, got {:?}", impute.buffer);
    }

    if !(impute.call_thresh > 0.0 && impute.call_thresh <= 1.0) {
        anyhow::bail!("call_thresh must be in (0, 1], got {}", impute.call_thresh);
    }

    if let Some(arg) = impute.extra_args.iter().find(|a| *a == "-o" || *a == "-int") {
        anyhow::bail!("extra_args must not contain {} (set per chunk)", arg);
    }

    Ok(())
}

/// Validate output configuration
pub fn validate_output(output: &OutputConfig) -> Result<()> {
    if let Some(ref path) = output.summary_json {
        if path.as_os_str().is_empty() {
            anyhow::bail!("summary_json must not be empty");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> DispatchConfig {
        DispatchConfig {
            inputs: InputPaths {
                chunks: PathBuf::from("chunks.txt"),
                map: PathBuf::from("map.txt"),
                ref_haplotypes: PathBuf::from("ref.hap"),
                ref_legend: PathBuf::from("ref.legend"),
                sample_haplotypes: PathBuf::from("sample.haps"),
                output_prefix: PathBuf::from("out"),
            },
            impute: ImputeParams::default(),
            policy: DispatchPolicy::default(),
            output: OutputConfig::default(),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&test_config()).is_ok());
    }

    #[test]
    fn test_validate_empty_prefix() {
        let mut config = test_config();
        config.inputs.output_prefix = PathBuf::new();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("prefix for output files"));
    }

    #[test]
    fn test_validate_ne() {
        let mut impute = ImputeParams::default();
        impute.ne = 0;
        assert!(validate_impute(&impute).is_err());

        impute.ne = 1;
        assert!(validate_impute(&impute).is_ok());
    }

    #[test]
    fn test_validate_call_thresh() {
        let mut impute = ImputeParams::default();
        for bad in [0.0, -0.5, 1.01, f64::NAN] {
            impute.call_thresh = bad;
            assert!(validate_impute(&impute).is_err(), "accepted {}", bad);
        }

        impute.call_thresh = 1.0;
        assert!(validate_impute(&impute).is_ok());
    }

    #[test]
    fn test_validate_program_and_buffer() {
        let mut impute = ImputeParams::default();
        impute.program = "  ".to_string();
        assert!(validate_impute(&impute).is_err());

        let mut impute = ImputeParams::default();
        impute.buffer = "250 kb".to_string();
        assert!(validate_impute(&impute).is_err());
    }

    #[test]
    fn test_validate_extra_args_reserved() {
        let mut impute = ImputeParams::default();
        impute.extra_args = vec!["-o".to_string(), "x".to_string()];
        assert!(validate_impute(&impute).is_err());

        impute.extra_args = vec!["-seed".to_string(), "7".to_string()];
        assert!(validate_impute(&impute).is_ok());
    }
}
