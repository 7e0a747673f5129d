use std::env::args_os;
use std::process::ExitCode;

use rgb_channel_splitter::{split_image_file, CLIParser};

fn main() -> ExitCode {
    let mut cli_parser = CLIParser::default();
    let arguments = cli_parser.parse(args_os());
    match split_image_file(&arguments) {
        Ok(output) => {
            for path in &output.written_files {
                println!("Wrote {}", path.display());
            }
            if arguments.print_data_urls() {
                for image in output.images.iter() {
                    println!("{}: {}", image.channel().as_str(), image.to_data_url());
                }
            }
            println!("Split successful");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Split failed because of: {}", e);
            ExitCode::FAILURE
        }
    }
}
