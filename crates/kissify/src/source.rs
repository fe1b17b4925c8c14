//! Parsing and printing at the edges of the pipeline
//!
//! The transform itself only sees trees. The CLI, the benches and the tests
//! go through here to turn text into a [`Program`] and back.

use anyhow::{Context, Result, anyhow, bail};
use swc_core::{
    common::{FileName, SourceMap, sync::Lrc},
    ecma::{
        ast::{EsVersion, Program},
        codegen::{Config as CodegenConfig, Emitter, Node, text_writer::JsWriter},
        parser::{EsSyntax, Syntax, parse_file_as_module},
    },
};

/// A parsed program together with the source map its spans point into
pub struct ParsedModule {
    pub source_map: Lrc<SourceMap>,
    pub program: Program,
}

// `SourceMap` does not implement `Debug`, so it is left out here
impl std::fmt::Debug for ParsedModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedModule")
            .field("program", &self.program)
            .finish_non_exhaustive()
    }
}

/// Parse `source` as an ECMAScript module
///
/// `name` only labels the source file in error messages.
pub fn parse(source: &str, name: &str) -> Result<ParsedModule> {
    let source_map: Lrc<SourceMap> = Lrc::default();
    let file = source_map.new_source_file(
        FileName::Custom(name.to_owned()).into(),
        source.to_owned(),
    );

    let mut recovered = Vec::new();
    let module = parse_file_as_module(
        &file,
        Syntax::Es(EsSyntax::default()),
        EsVersion::latest(),
        None,
        &mut recovered,
    )
    .map_err(|err| anyhow!("Failed to parse {name}: {}", err.kind().msg()))?;

    if let Some(err) = recovered.first() {
        bail!("Failed to parse {name}: {}", err.kind().msg());
    }

    Ok(ParsedModule {
        source_map,
        program: Program::Module(module),
    })
}

/// Print `program` back to JavaScript
pub fn print(program: &Program, source_map: &Lrc<SourceMap>) -> Result<String> {
    let mut buf = Vec::new();
    {
        let mut emitter = Emitter {
            cfg: CodegenConfig::default(),
            cm: source_map.clone(),
            comments: None,
            wr: JsWriter::new(source_map.clone(), "\n", &mut buf, None),
        };
        program
            .emit_with(&mut emitter)
            .context("Failed to emit JavaScript")?;
    }
    String::from_utf8(buf).context("Emitted JavaScript is not valid UTF-8")
}
