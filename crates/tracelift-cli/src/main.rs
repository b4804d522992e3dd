use clap::Parser;
use tracelift::{Cli, run};

fn main() {
    // Restore default SIGPIPE handling so piping into `head` or `less`
    // exits quietly instead of panicking
    #[cfg(unix)]
    reset_sigpipe();

    // Err only under --strict; hook mode always exits 0
    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(unix)]
fn reset_sigpipe() {
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}
