use clap::Parser;
use color_print::cprintln;
use ktroasm::util::display::{dump_items, dump_labels};
use ktroasm::{msg, Error};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input file
    input: PathBuf,

    /// Output file [default: <INPUT>.pkg]
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Write label map (yaml)
    #[clap(short, long)]
    map: Option<PathBuf>,

    /// Dump package and labels
    #[clap(short, long)]
    dump: bool,

    /// Reject re-defined labels
    #[clap(short, long)]
    strict: bool,

    /// Enable verbose output
    #[clap(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    let file = args.input.display().to_string();

    let source = match std::fs::read_to_string(&args.input) {
        Ok(source) => source,
        Err(err) => {
            Error::from(err).print_diag(&file, "");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(&args, &file, &source) {
        err.print_diag(&file, &source);
        std::process::exit(1);
    }
}

fn run(args: &Args, file: &str, source: &str) -> Result<(), Error> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("pkg"));

    if args.verbose {
        println!("KTRO Assembler");
        println!("1. Read File");
        println!("  < {}", file);
        println!("2. Parse & Assemble");
    }
    let assembly = ktroasm::assemble(file, source, args.strict)?;
    msg::dump(&assembly.msgs, file);

    if args.dump {
        dump_items(assembly.package.items());
        dump_labels(&assembly.labels);
    }

    if args.verbose {
        println!("3. Write Package");
        println!("  > {}", output.display());
        if let Some(map) = &args.map {
            println!("  > {}", map.display());
        }
    }
    assembly.write(&output, args.map.as_deref())?;

    if args.verbose {
        cprintln!("<g,s>Done</>: {} bytes", assembly.package.len());
    }
    Ok(())
}
