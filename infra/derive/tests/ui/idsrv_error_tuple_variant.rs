use idsrv_derive::idsrv_error;

#[idsrv_error]
pub enum DemoError {
    #[error("IO error: {0}")]
    Io(std::io::Error),
}

fn main() {}
