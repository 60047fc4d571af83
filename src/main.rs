
extern crate clap;
#[macro_use] extern crate log;
extern crate fern;
extern crate chrono;
extern crate regex;
extern crate term_grid;
extern crate thiserror;

pub mod compiler;

use clap::{Arg, ArgMatches, App};

use compiler::error::Error;
use compiler::symbols::Scoping;

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    let args = process_arguments();
    initialize_logging(args.occurrences_of("verbose"));

    debug!("Arguments:\n\tVerbosity: {}\n\tToken List Input: {}\n\tScan Only: {}\n\tBlock Scoping: {}\n\tOutfile: {}\n\tInfile: {}",
        match args.occurrences_of("verbose") {
            0 => log::LevelFilter::Error.to_string(),
            1 => log::LevelFilter::Warn.to_string(),
            2 => log::LevelFilter::Info.to_string(),
            3 | _ => log::LevelFilter::Debug.to_string(),
        },
        args.is_present("tokens"),
        args.is_present("scan"),
        args.is_present("block-scope"),
        args.value_of("output").unwrap_or("None"),
        args.value_of("INPUT").unwrap_or("None")
    );

    // clap rejects the command line before we get here if INPUT is missing.
    let ipath = Path::new(args.value_of("INPUT").unwrap_or_default());

    let text = match fs::read_to_string(&ipath) {
        Err(err) => {
            error!("fatal: unable to read input file `{}`: {}", ipath.display(), err);
            std::process::exit(1);
        },
        Ok(text) => text,
    };

    let scanned = if args.is_present("tokens") {
        compiler::token::read_token_list(&text)
    } else {
        compiler::lexer::tokenize(&text)
    };
    let tokens = match scanned {
        Ok(tokens) => tokens,
        Err(err) => {
            error!("fatal: {}", err);
            std::process::exit(1);
        },
    };

    if args.is_present("scan") {
        let opath = output_path(&args, ipath, "tok");
        write_output(&opath, &compiler::token::write_token_list(&tokens));
        return;
    }

    let config = compiler::Config {
        scoping: if args.is_present("block-scope") { Scoping::Block } else { Scoping::Flat },
        ..compiler::Config::default()
    };
    let opath = output_path(&args, ipath, "elf");

    let compiled = match compiler::compile(tokens, &config) {
        Ok(compiled) => compiled,
        Err(Error::Diagnostic(diag)) => {
            // The diagnostic replaces the object code.
            println!("{}", diag);
            write_output(&opath, &diag.to_string());
            std::process::exit(1);
        },
        Err(err @ Error::Fault(_)) => {
            error!("fatal: {}", err);
            std::process::exit(1);
        },
    };

    if args.is_present("print-debug") {
        println!("Assembly Code:\n");
        println!("{}", compiler::report::listing(&compiled.code));
        println!("Symbol Table:\n");
        println!("{}", compiler::report::symbol_report(&compiled.symbols));
    }

    write_output(&opath, &compiler::report::object_code(&compiled.code));
}

fn output_path(args: &ArgMatches, ipath: &Path, extension: &str) -> PathBuf {
    if let Some(filename) = args.value_of("output") {
        PathBuf::from(filename)
    } else {
        PathBuf::from(ipath.file_stem().unwrap_or_else(|| ipath.as_os_str())).with_extension(extension)
    }
}

fn write_output(opath: &Path, contents: &str) {
    let mut ofile = match File::create(opath) {
        Err(err) => {
            error!("fatal: unable to open output file `{}`: {}", opath.display(), err);
            std::process::exit(1);
        },
        Ok(file) => file,
    };

    if let Err(err) = ofile.write_all(contents.as_bytes()) {
        error!("fatal: unable to write to output file `{}`: {}", opath.display(), err);
        std::process::exit(1);
    }
    info!("Wrote `{}`.", opath.display());
}

fn process_arguments() -> ArgMatches<'static> {
    App::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(Arg::with_name("INPUT")
            .help("Sets the input file to use")
            .required(true)
            .multiple(false)
            .index(1))
        .arg(Arg::with_name("verbose")
            .short("v")
            .multiple(true)
            .takes_value(false)
            .help("Sets the level of verbosity"))
        .arg(Arg::with_name("output")
            .short("o")
            .takes_value(true)
            .help("write output to an outfile"))
        .arg(Arg::with_name("tokens")
            .short("t")
            .takes_value(false)
            .help("reads the input as a token list instead of source text"))
        .arg(Arg::with_name("scan")
            .short("e")
            .conflicts_with("tokens")
            .takes_value(false)
            .help("scan only, writing the token list"))
        .arg(Arg::with_name("block-scope")
            .short("b")
            .takes_value(false)
            .help("resolves names by block scope and addresses enclosing frames through static links"))
        .arg(Arg::with_name("print-debug")
            .short("d")
            .alias("show")
            .alias("s")
            .takes_value(false)
            .help("prints the assembly listing and symbol table to STDOUT"))
        .get_matches()
}

fn initialize_logging(verbosity: u64) {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(match verbosity {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Warn,
            2 => log::LevelFilter::Info,
            3 | _ => log::LevelFilter::Debug,
        })
        .chain(std::io::stderr())
        .apply().ok();
}
