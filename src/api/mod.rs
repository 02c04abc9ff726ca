// Conversion service client module
//
// - client: multipart upload over reqwest
// - transport: the seam UploadSession depends on
// - error: infrastructure errors

pub mod client;
pub mod error;
pub mod transport;

#[cfg(test)]
pub mod test_server;
