use crate::image::writer::DEFAULT_JPEG_QUALITY;
use crate::orchestrator::DEFAULT_PARALLEL_THRESHOLD;
use crate::Arguments;
use clap::{
    arg, crate_authors, crate_description, crate_name, crate_version, value_parser, Arg,
    ArgAction, ArgMatches, Command,
};
use std::ffi::OsString;
use std::path::PathBuf;
use std::{io, thread};

pub struct CLIParser {
    command: Command,
}

impl CLIParser {
    pub fn new() -> Self {
        let command = Self::create_base_command();
        let command = Self::register_arguments(command);
        CLIParser { command }
    }

    pub fn parse<I, T>(&mut self, itr: I) -> Arguments
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self
            .command
            .try_get_matches_from_mut(itr)
            .unwrap_or_else(|e| e.exit());
        Self::extract_arguments(&matches)
    }

    fn register_arguments(command: Command) -> Command {
        let command = Self::register_input_file_argument(command);
        let command = Self::register_output_directory_argument(command);
        let command = Self::register_mime_type_argument(command);
        let command = Self::register_threads_argument(command);
        let command = Self::register_parallel_threshold_argument(command);
        let command = Self::register_jpeg_quality_argument(command);
        Self::register_data_urls_argument(command)
    }

    fn register_input_file_argument(command: Command) -> Command {
        command.arg(Self::create_input_file_argument())
    }

    fn register_output_directory_argument(command: Command) -> Command {
        command.arg(Self::create_output_directory_argument())
    }

    fn register_mime_type_argument(command: Command) -> Command {
        command.arg(Self::create_mime_type_argument())
    }

    fn register_threads_argument(command: Command) -> Command {
        command.arg(Self::create_threads_argument())
    }

    fn register_parallel_threshold_argument(command: Command) -> Command {
        command.arg(Self::create_parallel_threshold_argument())
    }

    fn register_jpeg_quality_argument(command: Command) -> Command {
        command.arg(Self::create_jpeg_quality_argument())
    }

    fn register_data_urls_argument(command: Command) -> Command {
        command.arg(Self::create_data_urls_argument())
    }

    fn create_base_command() -> Command {
        Command::new(crate_name!())
            .version(crate_version!())
            .author(crate_authors!())
            .about(crate_description!())
    }

    fn create_input_file_argument() -> Arg {
        Arg::new("input_file")
            .help("Path to JPEG or PNG input file")
            .value_parser(value_parser!(PathBuf))
            .required(true)
    }

    fn create_output_directory_argument() -> Arg {
        arg!(output_directory: -o --output_directory <DIR> "Directory for the channel images, defaults to the directory of the input file")
            .value_parser(value_parser!(PathBuf))
            .required(false)
    }

    fn create_mime_type_argument() -> Arg {
        arg!(mime_type: -m --mime_type <MIME> "MIME type of the input, defaults to the one implied by the file extension")
            .required(false)
    }

    fn create_threads_argument() -> Arg {
        arg!(-t --threads <THREADS> "Number of Threads")
            .default_value(get_number_of_threads().unwrap_or(1).to_string())
            .required(false)
            .value_parser(value_parser!(usize))
    }

    fn create_parallel_threshold_argument() -> Arg {
        arg!(parallel_threshold: --parallel_threshold <PIXELS> "Smallest number of pixels split on multiple threads")
            .default_value(DEFAULT_PARALLEL_THRESHOLD.to_string())
            .value_parser(value_parser!(usize))
    }

    fn create_jpeg_quality_argument() -> Arg {
        arg!(jpeg_quality: -q --jpeg_quality <QUALITY> "Quality of JPEG channel images")
            .default_value(DEFAULT_JPEG_QUALITY.to_string())
            .value_parser(value_parser!(u8).range(1..=100))
    }

    fn create_data_urls_argument() -> Arg {
        arg!(data_urls: --data_urls "Print the images as data URLs").action(ArgAction::SetTrue)
    }

    fn extract_arguments(matches: &ArgMatches) -> Arguments {
        Arguments {
            input_file: Self::extract_input_file_argument(matches),
            output_directory: Self::extract_output_directory_argument(matches),
            mime_type: Self::extract_mime_type_argument(matches),
            number_of_threads: Self::extract_threads_argument(matches),
            parallel_threshold: Self::extract_parallel_threshold_argument(matches),
            jpeg_quality: Self::extract_jpeg_quality_argument(matches),
            print_data_urls: Self::extract_data_urls_argument(matches),
        }
    }

    fn extract_input_file_argument(matches: &ArgMatches) -> PathBuf {
        matches
            .get_one::<PathBuf>("input_file")
            .expect("Required argument input_file not provided")
            .clone()
    }

    fn extract_output_directory_argument(matches: &ArgMatches) -> Option<PathBuf> {
        matches.get_one::<PathBuf>("output_directory").cloned()
    }

    fn extract_mime_type_argument(matches: &ArgMatches) -> Option<String> {
        matches.get_one::<String>("mime_type").cloned()
    }

    fn extract_threads_argument(matches: &ArgMatches) -> usize {
        matches
            .get_one::<usize>("threads")
            .expect("Required argument threads not provided")
            .to_owned()
    }

    fn extract_parallel_threshold_argument(matches: &ArgMatches) -> usize {
        matches
            .get_one::<usize>("parallel_threshold")
            .expect("Parallel threshold must be provided, but was unset.")
            .to_owned()
    }

    fn extract_jpeg_quality_argument(matches: &ArgMatches) -> u8 {
        matches
            .get_one::<u8>("jpeg_quality")
            .expect("JPEG quality must be provided, but was unset.")
            .to_owned()
    }

    fn extract_data_urls_argument(matches: &ArgMatches) -> bool {
        matches.get_flag("data_urls")
    }
}

impl Default for CLIParser {
    fn default() -> Self {
        Self::new()
    }
}

fn get_number_of_threads() -> io::Result<usize> {
    Ok(thread::available_parallelism()?.get())
}
