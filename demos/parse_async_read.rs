use tokio::io::AsyncRead;
// Import multer-extract types.
use multer_extract::FileStream;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate an `AsyncRead` from somewhere e.g. a socket or a saved request.
    let reader = get_async_reader_from_somewhere().await;

    // Create a `FileStream` instance from that async reader, no boundary needed.
    let mut file = FileStream::with_reader(reader);

    // Iterate over the payload chunks of the first part.
    while let Some(chunk) = file.chunk().await? {
        println!("Chunk: {:?}", chunk);
    }

    println!(
        "Boundary: {:?}",
        file.boundary().map(|b| String::from_utf8_lossy(b).into_owned())
    );

    Ok(())
}

// Generate an `AsyncRead` from somewhere e.g. a socket or a saved request.
async fn get_async_reader_from_somewhere() -> impl AsyncRead + Unpin + Send {
    let data = "POST /upload HTTP/1.1\r\nContent-Type: multipart/form-data; boundary=X-BOUNDARY\r\n\r\n--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"File Field\"; filename=\"a-text-file.txt\"\r\nContent-Type: text/plain\r\n\r\nHello world\nHello\r\nWorld\rAgain\r\n--X-BOUNDARY--\r\n";

    data.as_bytes()
}
