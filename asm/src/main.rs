use sm213asm::{msg::Msg, util::print_dump, Error, Lexer};
use std::path::Path;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input file
    #[clap(default_value = "main.s")]
    input: String,

    /// Output file [default: input with the extension replaced by .img]
    #[clap(short, long)]
    output: Option<String>,

    /// Dump assembled listing
    #[clap(short, long)]
    dump: bool,
}

fn main() {
    use clap::Parser;

    let args: Args = Args::parse();
    println!("SM213 Assembler");

    let source = match std::fs::read_to_string(&args.input) {
        Ok(source) => source,
        Err(err) => {
            Msg::Error(Error::FileOpen(args.input.clone(), err).to_string()).print();
            std::process::exit(1);
        }
    };
    let lines: Vec<&str> = source.lines().collect();

    if let Err(err) = run(&args, &source, &lines) {
        err.print_diag(&args.input, &lines);
        std::process::exit(1);
    }
}

fn run(args: &Args, source: &str, lines: &[&str]) -> Result<(), Error> {
    println!("1. Read File and Tokenize");
    println!("  < {}", args.input);
    let tokens = Lexer::new(source).parse()?;

    println!("2. Assemble & Resolve Labels");
    let out = sm213asm::assemble(&tokens)?;
    for overlap in &out.overlaps {
        let msg = Msg::Warn(overlap.to_string());
        match overlap.later.2 {
            Some(pos) => msg.diag(&args.input, pos, lines),
            None => msg.print(),
        }
        if let Some(pos) = overlap.earlier.2 {
            Msg::Note("earlier block starts here".to_string()).diag(&args.input, pos, lines);
        }
    }

    let output = match &args.output {
        Some(output) => output.clone(),
        None => Path::new(&args.input)
            .with_extension("img")
            .to_string_lossy()
            .into_owned(),
    };
    println!("3. Write Binary");
    println!("  > {}", output);
    std::fs::write(&output, &out.image).map_err(|err| Error::FileWrite(output.clone(), err))?;

    if args.dump {
        print_dump(&out.listing, &out.image, &out.labels);
    }
    Ok(())
}
