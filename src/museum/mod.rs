pub mod annotations;
pub mod classify;
pub mod door;
pub mod proximity;
pub mod spawn;
pub mod transition;

pub use annotations::{AnnotationContent, AnnotationRegistry, AnnotationSlot, AnnotationWidget, ImageBinding};
pub use classify::SurfaceRules;
pub use door::{DoorState, DoorStateMachine, PickOutcome};
pub use proximity::ProximityTrigger;
pub use spawn::SpawnResolver;
pub use transition::{
    Collaborators, IgnoreReason, PickTarget, SceneSession, SceneTransitionController, SessionToken,
    TransitionRequest,
};
