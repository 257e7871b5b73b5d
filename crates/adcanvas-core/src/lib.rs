//! adcanvas Core Library
//!
//! Scene graph, viewport, snapshot history, alignment guides and the tool
//! state machine of the adcanvas 2D scene editor.

pub mod acquire;
pub mod config;
pub mod editor;
pub mod events;
pub mod guides;
pub mod history;
pub mod input;
pub mod scene;
pub mod shapes;
pub mod shortcuts;
pub mod text_edit;
pub mod tools;
pub mod viewport;

pub use acquire::{
    AcquireError, AcquireResult, BoxFuture, EmbeddedImageSource, FontRegistry, FontSource,
    ImageRequestSource, ImageSource, ImageTicket, PlacementOptions,
};
pub use config::{ConfigError, EditorConfig};
pub use editor::{Editor, ImageCrop};
pub use events::{EditorEvent, EditorObserver};
pub use guides::{GuideAxis, GuideEngine, GuideLine, SnapFrame, SnapResult};
pub use history::{History, HistoryState};
pub use input::{Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use scene::{LayerInfo, SceneDocument, SceneError, SceneGraph, SceneResult};
pub use shapes::{SerializableColor, Shape, ShapeId, ShapeKind, ShapeStyle, ShapeType};
pub use shortcuts::{Shortcut, ShortcutAction, ShortcutRegistry};
pub use text_edit::{TextEditResult, TextEditSession};
pub use tools::{Cursor, Interaction, Tool, ToolContext, ToolKind, ToolOption, ToolRegistry};
pub use viewport::{Viewport, WheelOutcome};
