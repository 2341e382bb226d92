use clap::Parser;
use log::info;

use luac53::listing::Listing;
use luac53::{DecoderOptions, undump_with_options};

/// Command-line arguments parser
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "List the contents of precompiled Lua 5.3 chunks"
)]
struct Arguments {
    /// Paths to the Lua bytecode files to list
    #[clap(
        required = true,
        help = "One or more Lua 5.3 bytecode files to list.",
        value_name = "FILE",
        value_hint = clap::ValueHint::FilePath
    )]
    files: Vec<String>,

    /// Print the decoded tree instead of the listing
    #[clap(long)]
    tree: bool,

    /// Reject files with bytes left after the main function
    #[clap(long)]
    strict: bool,

    /// Maximum nesting depth of functions
    #[clap(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Maximum declared length of any section
    #[clap(long, value_name = "N")]
    max_sequence_len: Option<usize>,

    /// Maximum size of a single string constant or name
    #[clap(long, value_name = "BYTES")]
    max_string_len: Option<usize>,
}

impl Arguments {
    fn decoder_options(&self) -> DecoderOptions {
        let mut options = DecoderOptions::default().with_trailing_bytes(!self.strict);
        if let Some(limit) = self.max_depth {
            options = options.with_max_depth(limit);
        }
        if let Some(limit) = self.max_sequence_len {
            options = options.with_max_sequence_len(limit);
        }
        if let Some(limit) = self.max_string_len {
            options = options.with_max_string_len(limit);
        }
        options
    }
}

fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Arguments::parse();
    let options = args.decoder_options();
    let mut failed = false;

    for file_path in &args.files {
        info!("Reading chunk: {}", file_path);

        let bytecode = match std::fs::read(file_path) {
            Ok(data) => data,
            Err(err) => {
                eprintln!("{}: cannot read file: {}", file_path, err);
                failed = true;
                continue;
            }
        };

        match undump_with_options(&bytecode, &options) {
            Ok(main) => {
                info!(
                    "Decoded {} function(s) from {} bytes",
                    main.function_count(),
                    bytecode.len()
                );

                if args.tree {
                    println!("{:#?}", main);
                } else {
                    print!("{}", Listing(&main));
                }
            }
            Err(err) => {
                eprintln!("{}: {}", file_path, err);
                failed = true;
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}
