//! One-shot TCP servers that play a script to the first client

use std::io::Write;
use std::net::{SocketAddr, TcpListener};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Step of a server script
pub enum Step {
    /// Write these bytes
    Send(Vec<u8>),
    /// Pause
    Sleep(Duration),
}

/// Bind to an ephemeral port and play `script` to the first client, then
/// close the connection
pub fn serve(script: Vec<Step>) -> (SocketAddr, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept test client");
        for step in script {
            match step {
                Step::Send(bytes) => {
                    if stream.write_all(&bytes).is_err() {
                        return;
                    }
                }
                Step::Sleep(d) => thread::sleep(d),
            }
        }
    });

    (addr, handle)
}

/// Send `payload` split into pieces of `chunk` bytes with a short pause
/// between pieces
pub fn serve_chunked(payload: &[u8], chunk: usize) -> (SocketAddr, JoinHandle<()>) {
    let script = payload
        .chunks(chunk)
        .flat_map(|piece| {
            [
                Step::Send(piece.to_vec()),
                Step::Sleep(Duration::from_millis(1)),
            ]
        })
        .collect();
    serve(script)
}

/// An address with nothing listening on it
pub fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind unused port");
    listener.local_addr().expect("unused port address")
}
