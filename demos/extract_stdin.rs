use std::io;
use std::process::ExitCode;

// Pipe a raw HTTP request, or just its multipart body, into stdin and the
// first file lands on stdout:
//
//     cargo run --example extract_stdin < request.txt > upload.bin
fn main() -> ExitCode {
    let stdin = io::stdin();
    let stdout = io::stdout();

    match multer_extract::copy_payload(stdin.lock(), stdout.lock()) {
        Ok(written) => {
            eprintln!("Received {} bytes", written);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("No file received: {}", err);
            ExitCode::FAILURE
        }
    }
}
