pub mod completion;
pub mod court;
pub mod error;
pub mod forms;
pub mod jurisdiction;
pub mod legal_text;
pub mod places;
pub mod presuit;

pub use completion::{CompletionBackend, CompletionRequest, OpenAiBackend};
pub use error::EnrichError;
pub use forms::{FormFetcher, HttpFormFetcher};
pub use places::PlacesClient;
