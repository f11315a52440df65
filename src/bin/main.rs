extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;
extern crate shlex;
extern crate typeahead;

use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};

use clap::Parser;
use color_eyre::eyre::Result;
use typeahead::{Typeahead, TypeaheadOptions};

fn parse_args() -> Result<TypeaheadOptions> {
    let mut args: Vec<String> = env::args().take(1).collect();
    args.extend(
        env::var("TYPEAHEAD_DEFAULT_OPTIONS")
            .ok()
            .and_then(|val| shlex::split(&val))
            .unwrap_or_default(),
    );
    args.extend(env::args().skip(1));

    Ok(TypeaheadOptions::try_parse_from(args)?.build())
}

fn init_logger(opts: &TypeaheadOptions) -> Result<()> {
    let mut builder = env_logger::builder();
    builder.format_timestamp_nanos();
    // stderr belongs to the TUI, logs only go there when no file is given
    if let Some(path) = &opts.log_file {
        builder.target(env_logger::Target::Pipe(Box::new(File::create(path)?)));
    }
    builder.try_init()?;
    Ok(())
}

//------------------------------------------------------------------------------
fn main() {
    let opts = match parse_args() {
        Ok(opts) => opts,
        Err(err) => match err.downcast::<clap::Error>() {
            Ok(clap_err) => clap_err.exit(),
            Err(err) => {
                eprintln!("typeahead: {err}");
                std::process::exit(2)
            }
        },
    };
    if let Err(err) = init_logger(&opts) {
        eprintln!("typeahead: could not set up logging: {err}");
    }

    match typeahead_main(opts) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(err) => {
            // downstream pipe closed
            if err
                .downcast_ref::<io::Error>()
                .is_some_and(|e| e.kind() == io::ErrorKind::BrokenPipe)
            {
                std::process::exit(0)
            }
            error!("{err:?}");
            eprintln!("typeahead: {err}");
            std::process::exit(2)
        }
    }
}

fn typeahead_main(opts: TypeaheadOptions) -> Result<i32> {
    let output = Typeahead::run_with(opts, None)?;

    if let Some(item) = &output.selected
        && !output.is_abort
    {
        let mut stdout = BufWriter::new(io::stdout().lock());
        writeln!(stdout, "{item}")?;
        stdout.flush()?;
    }

    Ok(output.exit_code())
}
