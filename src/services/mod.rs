pub mod compile_info;
pub mod row_extractor;
pub mod verdict;

pub use compile_info::CompileInfoRetriever;
pub use row_extractor::extract;
pub use verdict::classify;
