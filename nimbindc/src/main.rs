use anyhow::Context;
use clap::Parser;
use nimbind::codegen::introspect;
use nimbind::{Config, Generator, Oracle, SymbolTable};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "nimbindc",
    version,
    about = "generate Nim bindings from a resolved symbol table"
)]
struct Cli {
    /// the symbol table (`.json`) to translate
    input: PathBuf,

    /// don't print diagnostics
    #[arg(short, long)]
    quiet: bool,

    /// print type introspection for symbols whose name starts with PREFIX
    #[arg(long, value_name = "PREFIX")]
    debug: Option<String>,

    /// with --debug, also dump the raw symbol
    #[arg(long, requires = "debug")]
    dump: bool,

    /// extra names to leave out, on top of the built-in denylist
    #[arg(long = "deny", value_name = "NAME")]
    deny: Vec<String>,

    /// write the bindings here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Cli::parse();

    let table = SymbolTable::load(&args.input)
        .with_context(|| format!("couldn't load {}", args.input.display()))?;
    let config = Config::default().deny(&args.deny);

    if let Some(prefix) = &args.debug {
        for sym in table
            .symbols()
            .iter()
            .filter(|sym| sym.name.starts_with(prefix.as_str()))
        {
            eprint!("{}", introspect::describe(&table, sym, args.dump));
        }
    }

    let bindings = Generator::new(&table, &config)
        .generate()
        .context("failed to generate bindings")?;

    if !args.quiet {
        for diagnostic in &bindings.diagnostics {
            eprintln!("{diagnostic}");
        }
    }

    match &args.output {
        Some(path) => {
            bindings
                .write_to(path)
                .with_context(|| format!("couldn't write {}", path.display()))?;
            log::info!("→ wrote {} declarations to {}", bindings.emitted, path.display());
        }
        None => print!("{}", bindings.text),
    }
    Ok(())
}
