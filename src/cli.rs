use clap::{value_parser, crate_version, Arg, ArgAction, Command, ValueHint};

const IN_HELP: &str = "if disk image is piped, omit `--dimg` option";
const WOZ_HELP: &str = "for WOZ the cylinder is the integer part of the track position";
const PRO_LONG_HELP: &str = "Use the proprietary track format that is described in the file at PATH.
The file should contain a JSON string describing a GCR soft sectoring scheme.
To get an example of this file use `a2kit geometry --abstract ...` on a standard WOZ";
const BACKEND_LONG_HELP: &str = "Path to the a2kit executable.  If omitted we try the A2KIT_PATH
environment variable, then `server/<os>-<arch>/a2kit` beside this executable,
then the cargo install directory.";

fn file_arg(help: &'static str, value_name: &'static str, req: bool) -> Arg {
    Arg::new("file").short('f').long("file").value_name(value_name).required(req).help(help)
}

fn pro_arg() -> Arg {
    Arg::new("pro").long("pro").value_name("PATH").help("use proprietary track format")
                .long_help(PRO_LONG_HELP)
                .value_hint(ValueHint::FilePath)
                .required(false)
}

fn backend_arg() -> Arg {
    Arg::new("backend").long("backend").value_name("PATH").help("path to a2kit executable")
        .long_help(BACKEND_LONG_HELP)
        .value_hint(ValueHint::ExecutablePath)
        .required(false)
}

fn console_arg() -> Arg {
    Arg::new("console").long("console").help("format for console unconditionally")
        .required(false)
        .action(ArgAction::SetTrue)
        .long_help("even if the output context is a file or pipe, format it for the console")
}

fn indent_arg() -> Arg {
    Arg::new("indent").long("indent").help("JSON indentation")
        .value_name("SPACES")
        .value_parser(value_parser!(u16).range(0..16))
        .required(false)
        .default_value("4")
}

fn dimg_arg() -> Arg {
    Arg::new("dimg").short('d').long("dimg").help("path to disk image itself")
        .value_name("PATH")
        .value_hint(ValueHint::FilePath)
        .required(false)
}

fn method_arg() -> Arg {
    Arg::new("method").long("method").help("select decoding methodology")
        .value_name("METHOD")
        .value_parser(["auto","fast","analyze","emulate"])
        .required(false)
        .default_value("auto")
}

fn timeout_arg() -> Arg {
    Arg::new("timeout").long("timeout").help("seconds to wait for each a2kit request")
        .value_name("SECS")
        .value_parser(value_parser!(u64).range(1..3600))
        .required(false)
        .default_value("10")
}

/// Add the arguments every image subcommand accepts
fn image_cmd(cmd: Command) -> Command {
    cmd.arg(dimg_arg())
        .arg(backend_arg())
        .arg(timeout_arg())
        .arg(pro_arg())
        .arg(method_arg())
}

pub fn build_cli() -> Command {
    let long_help = "a2nib is always invoked with exactly one of several subcommands.
Disk image formats are handled by a2kit, which must be installed.
Set RUST_LOG environment variable to control logging level.
  levels: trace,debug,info,warn,error

Examples:
---------
list track nibbles:    `a2nib track -f 17,0 -d myimg.woz`
piped image:           `cat myimg.woz | a2nib track -f 17,0`
hex dump of sector:    `a2nib sec -f 0,0,15 -d myimg.nib`
offline listing:       `a2nib dump -s 16 -f track17.bin`";

    let mut main_cmd = Command::new("a2nib")
        .about("Lists the nibble streams of Apple II disk images.")
        .after_long_help(long_help)
        .version(crate_version!());

    main_cmd = main_cmd.subcommand(image_cmd(
        Command::new("track")
            .arg(file_arg("track to list","CYL,HEAD",true))
            .about("list nibbles of a track with hex and mnemonics")
            .after_help(WOZ_HELP.to_string() + "\n" + IN_HELP)
    ));
    main_cmd = main_cmd.subcommand(image_cmd(
        Command::new("sec")
            .arg(file_arg("sectors to read, more sectors on the same track can follow","CYL,HEAD,SEC[,SEC...]",true))
            .arg(console_arg())
            .about("read physical sectors")
            .after_help(IN_HELP)
    ));
    main_cmd = main_cmd.subcommand(image_cmd(
        Command::new("block")
            .arg(file_arg("block to read","BLOCK",true))
            .arg(console_arg())
            .about("read a file system block")
            .after_help(IN_HELP)
    ));
    main_cmd = main_cmd.subcommand(image_cmd(
        Command::new("meta")
            .arg(indent_arg())
            .about("write disk image metadata as JSON")
            .after_help(IN_HELP)
    ));
    main_cmd = main_cmd.subcommand(image_cmd(
        Command::new("geometry")
            .arg(indent_arg())
            .about("write disk geometry and track solutions as JSON")
            .after_help(IN_HELP)
    ));
    main_cmd = main_cmd.subcommand(image_cmd(
        Command::new("stat")
            .arg(indent_arg())
            .about("write file system statistics as JSON")
            .after_help(IN_HELP)
    ));
    main_cmd = main_cmd.subcommand(image_cmd(
        Command::new("nibdesc")
            .about("show the nibble descriptor that applies to the image")
            .after_help(IN_HELP)
    ));
    main_cmd = main_cmd.subcommand(image_cmd(
        Command::new("has-nibbles")
            .about("test whether the image can produce track nibbles")
            .after_help(IN_HELP)
    ));
    main_cmd = main_cmd.subcommand(
        Command::new("dump")
            .arg(
                Arg::new("std").short('s').long("std").help("standard nibble descriptor")
                    .value_name("STD")
                    .required(true)
                    .value_parser(["13","16","35"])
            )
            .arg(file_arg("file with aligned nibbles","PATH",false).value_hint(ValueHint::FilePath))
            .about("list nibbles that are already aligned, without a disk image")
            .after_help("if nibbles are piped, omit `--file` option")
    );
    main_cmd = main_cmd.subcommand(
        Command::new("completions")
            .arg(
                Arg::new("shell").short('s').long("shell").help("shell target").value_name("NAME")
                    .required(true)
                    .value_parser(["bash","elv","fish","ps1","zsh"])
            )
            .about("write completions script to stdout for the specified shell")
    );
    return main_cmd;
}
