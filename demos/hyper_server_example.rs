use std::{convert::Infallible, net::SocketAddr};

use bytes::Bytes;
use futures_util::StreamExt;
use http_body_util::{BodyStream, Full};
use hyper::{body::Incoming, Request, Response, StatusCode};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
// Import the multer-extract types.
use multer_extract::{FileStream, SizeLimit};

// A handler for incoming requests.
async fn handle(req: Request<Incoming>) -> Result<Response<Full<Bytes>>, Infallible> {
    // Store the uploaded file, the boundary is found in the body itself.
    match save_upload(req.into_body()).await {
        Ok(len) => Ok(Response::new(Full::from(format!("Stored {} bytes", len)))),
        Err(err) => Ok(Response::builder()
            .status(StatusCode::BAD_REQUEST)
            .body(Full::from(format!("BAD REQUEST: {}", err)))
            .unwrap()),
    }
}

// Stream the first part of the request body into a file.
async fn save_upload(body: Incoming) -> Result<usize, Box<dyn std::error::Error + Send + Sync>> {
    // Convert the body into a stream of data frames.
    let body_stream = BodyStream::new(body)
        .filter_map(|result| async move { result.map(|frame| frame.into_data().ok()).transpose() });

    // Refuse uploads over 10 MiB.
    let size_limit = SizeLimit::new().payload(10 * 1024 * 1024);
    let mut upload = FileStream::with_size_limit(body_stream, size_limit);

    let path = std::env::temp_dir().join("multer-extract-upload.bin");
    let mut file = File::create(&path).await?;

    // Process the payload chunks as they arrive.
    let mut len = 0;
    while let Some(chunk) = upload.chunk().await? {
        file.write_all(&chunk).await?;
        len += chunk.len();
    }
    file.flush().await?;

    println!("Stored {} bytes in {}", len, path.display());

    Ok(len)
}

#[tokio::main]
async fn main() {
    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    println!("Server running at: {}", addr);

    let service = hyper::service::service_fn(handle);

    loop {
        let (socket, _remote_addr) = listener.accept().await.unwrap();
        let socket = hyper_util::rt::TokioIo::new(socket);
        tokio::spawn(async move {
            if let Err(e) = hyper::server::conn::http1::Builder::new()
                .serve_connection(socket, service)
                .await
            {
                eprintln!("server error: {}", e);
            }
        });
    }
}
