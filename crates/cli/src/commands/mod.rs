pub mod ask;
pub mod doctor;
pub mod faqs;
pub mod init;
pub mod serve;
pub mod status;
