//! Domain model definitions.

pub mod invitation;
pub mod movie;
pub mod space;
pub mod user;
pub mod video_extraction;
pub mod watchlist;

pub use invitation::{
    InvitationResponse, InvitationStatus, InvitedByInfo, PendingInvitationResponse,
    PendingSpaceInfo, SendInvitationRequest,
};
pub use movie::{MovieRecord, UpdateMovieRequest};
pub use space::{AddMemberRequest, AddMovieRequest, CreateSpaceRequest, SpaceResponse};
pub use user::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
pub use video_extraction::{
    AddToListRequest, AddToListResponse, AddedToList, AnalyzeVideoRequest, AnalyzeVideoResponse,
    Confidence, ExtractedMovie, ExtractionHistoryResponse, ExtractionResponse, ListDestination,
    ListDestinationKind, Platform, VideoMetadata,
};
pub use watchlist::MessageResponse;
