// fm main program
// Version 0.1
//
// Boots the interpreter, evaluates any file given with -f, and runs the read-eval-print loop.
// Errors inside a line are reported in its response and never stop the loop; only the end of
// input or BYE does.

mod config;
mod internals;
mod kernel;
mod runtime;

use std::io::Write;
use std::path::Path;

use config::{Config, VERSION};
use internals::files::FileHandle;
use internals::terminal;
use runtime::ForthRuntime;

const WELCOME_MESSAGE: &str = "Welcome to fm.";
const EXIT_MESSAGE: &str = "Finished";

fn boot_forth(config: &Config) -> ForthRuntime {
    let mut forth = ForthRuntime::new();
    forth.msg.set_level(config.level());
    forth
}

/// run_lines evaluates every line from a source until it runs out or BYE is seen
///     With echo set, each response is printed on its own line.
///     Without it only errors are printed, tagged with the line they came from.
///
fn run_lines(forth: &mut ForthRuntime, source: &mut FileHandle, out: &mut impl Write, echo: bool) {
    while let Some(line) = source.get_line() {
        let response = forth.eval(&line);
        let written = if echo {
            writeln!(out, "{response}")
        } else if response.contains(" ? ") {
            writeln!(out, "line {}:{response}", source.line_number())
        } else {
            Ok(())
        };
        if let Err(e) = written.and_then(|_| out.flush()) {
            forth.msg.error("run_lines", "write error", Some(e.to_string()));
        }
        if forth.should_exit() {
            break;
        }
    }
}

fn load_file(forth: &mut ForthRuntime, file_name: &str) {
    forth.msg.info("load_file", "Loading file", Some(file_name));
    if let Some(mut source) = FileHandle::new_file(Path::new(file_name), forth.msg.clone()) {
        run_lines(forth, &mut source, &mut std::io::stdout(), false);
    }
}

fn run_forth(forth: &mut ForthRuntime, config: &Config) {
    let mut console = FileHandle::new_console(config.plain, forth.msg.clone());
    if !config.quiet && console.is_interactive() {
        println!("{WELCOME_MESSAGE} Version {VERSION}. Type BYE or Ctrl-D to quit.");
    }
    run_lines(forth, &mut console, &mut std::io::stdout(), true);
    if let Err(e) = terminal::restore() {
        forth.msg.error("run_forth", "terminal restore", Some(e.to_string()));
    }
    if !config.quiet && console.is_interactive() {
        println!("{EXIT_MESSAGE}");
    }
}

fn main() {
    let mut config = Config::new();
    config.process_args();

    let mut forth = boot_forth(&config);
    if let Some(file_name) = config.file.as_deref() {
        load_file(&mut forth, file_name);
    }
    if !forth.should_exit() {
        run_forth(&mut forth, &config);
    }
}
