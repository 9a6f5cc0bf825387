/*!
 * Document translation.
 *
 * - `chunker`: splits a document into token-bounded chunks on paragraph, line
 *   and sentence boundaries
 * - `client`: translates one chunk and extracts the `<result>` payload
 * - `retry`: exponential backoff shared by the chunk loop and the HTTP send
 * - `pipeline`: sequential driver writing each chunk as it is translated
 */

// Re-export main types for easier usage
pub use self::chunker::{estimate_tokens, Chunker};
pub use self::client::{Translate, TranslationClient};
pub use self::pipeline::{DocumentPipeline, PipelineStats};
pub use self::retry::{with_retry, RetryPolicy};

// Submodules
pub mod chunker;
pub mod client;
pub mod pipeline;
pub mod retry;
