//! impute2 invocation for one chunk
//!
//! The argument order and literals match the established command line:
//!
//! ```text
//! impute2 -m <map> -use_prephased_g -known_haps_g <sample haps> -h <ref haps>
//!         -l <ref legend> -Ne 20000 -int <start> <end> -buffer 250kb
//!         -call_thresh 0.9 -allow_large_regions -o <output>
//! ```
//!
//! Arguments are kept as an argv vector and handed to the OS directly, so paths
//! containing spaces or shell metacharacters reach impute2 intact.

use crate::chunk::ChunkDescriptor;
use crate::config::{ImputeParams, InputPaths};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Fixed suffix of every per-chunk output file
pub const OUTPUT_SUFFIX: &str = ".best_guess_haps_imputation.impute2";

/// Output file for one chunk: `<prefix>.pos<start>-<end>.best_guess_haps_imputation.impute2`
pub fn output_path(prefix: &Path, chunk: &ChunkDescriptor) -> PathBuf {
    let mut name = prefix.as_os_str().to_owned();
    name.push(format!(".pos{}-{}{}", chunk.start, chunk.end, OUTPUT_SUFFIX));
    PathBuf::from(name)
}

/// A fully-formed impute2 invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImputeCommand {
    program: OsString,
    args: Vec<OsString>,
    output: PathBuf,
}

impl ImputeCommand {
    /// Build the invocation for `chunk`
    pub fn build(inputs: &InputPaths, params: &ImputeParams, chunk: &ChunkDescriptor) -> Self {
        let output = output_path(&inputs.output_prefix, chunk);

        let mut args: Vec<OsString> = Vec::with_capacity(24 + params.extra_args.len());
        args.push("-m".into());
        args.push(inputs.map.clone().into());
        args.push("-use_prephased_g".into());
        args.push("-known_haps_g".into());
        args.push(inputs.sample_haplotypes.clone().into());
        args.push("-h".into());
        args.push(inputs.ref_haplotypes.clone().into());
        args.push("-l".into());
        args.push(inputs.ref_legend.clone().into());
        args.push("-Ne".into());
        args.push(params.ne.to_string().into());
        args.push("-int".into());
        args.push(chunk.start.clone().into());
        args.push(chunk.end.clone().into());
        args.push("-buffer".into());
        args.push(params.buffer.clone().into());
        args.push("-call_thresh".into());
        args.push(params.call_thresh.to_string().into());
        if params.allow_large_regions {
            args.push("-allow_large_regions".into());
        }
        args.extend(params.extra_args.iter().map(OsString::from));
        args.push("-o".into());
        args.push(output.clone().into());

        Self {
            program: params.program.clone().into(),
            args,
            output,
        }
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Space-joined command line, for logs and dry runs
    pub fn render(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|part| part.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
