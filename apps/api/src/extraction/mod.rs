// Requirement extraction: PDF → docx → requirement records → styled xlsx.
// Library-bound steps run inside tokio::task::spawn_blocking (see pipeline).

pub mod converter;
pub mod docx;
pub mod handlers;
pub mod pipeline;
pub mod requirements;
pub mod spreadsheet;
