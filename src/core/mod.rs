pub mod clock;
pub mod controller;
pub mod fps;
pub mod gpu_context;
pub mod input_adapter;

pub use clock::Clock;
pub use controller::{Button, Controller, InputHandler, Signal};
pub use fps::FpsCounter;
pub use gpu_context::{GpuContext, ValidationTarget};
pub use input_adapter::WinitController;
