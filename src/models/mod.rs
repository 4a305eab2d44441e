pub mod article;
pub mod loaders;
pub mod outcome;
pub mod payload;

pub use article::{flatten_articles, Article, ArticleRecord, ArticlesResponse, GenericArticle, OemNumber, SearchQueryMatch};
pub use loaders::load_worklist;
pub use outcome::{BatchAccumulator, ItemOutcome, NoMatchRecord, PageResult, ProblemRecord};
pub use payload::{GetArticlesRequest, Payload};
