pub mod campaign;
pub mod product;
pub mod result;
pub mod session;

pub use campaign::{NormalizedCampaignGroup, RawCampaignRow};
pub use product::ProductRecord;
pub use result::{
    CampaignMatch, ManualChoice, ManualDecision, MatchOrigin, MatchResult, MANUAL_MATCH_SCORE,
    MANUAL_NO_PRODUCT_SCORE,
};
pub use session::{FileReport, FileStatus, InputKind, ReconcileSession};
