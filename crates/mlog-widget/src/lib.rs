//! # mlog-widget - Log widget state machine for Modern Logger
//!
//! A scrolling log view that batches appends, shows an animated loading
//! indicator and follows new content only while the user stays at the
//! bottom. It is independent of any UI toolkit: rendering goes through
//! [`DisplaySurface`] and deferred work through [`Scheduler`].
//!
//! ## Threading
//!
//! [`LogWidget`] lives on the UI thread. Other threads log through a
//! [`LogSink`] (or a [`GuiLogger`] wrapping one); records are applied when
//! the UI thread calls [`LogWidget::pump`] or delivers a timer.
//!
//! ## Modules
//! - `surface` - [`DisplaySurface`], [`LineId`], [`MemorySurface`]
//! - `scheduler` - [`Timer`], [`Scheduler`], [`TimerQueue`]
//! - `batcher` - [`MessageBatcher`]
//! - `indicator` - loading indicator state, [`LoadingOptions`], [`Completion`]
//! - `scroll` - [`ScrollTracker`]
//! - `sink` - [`LogSink`], [`GuiLogger`]
//! - `producer` - [`ProducerPool`] for background tasks feeding a widget

pub mod batcher;
pub mod indicator;
pub mod producer;
pub mod scheduler;
pub mod scroll;
pub mod sink;
pub mod surface;
pub mod widget;

pub use batcher::{BatchAction, MessageBatcher, DEFAULT_BATCH_SIZE};
pub use indicator::{
    Completion, IndicatorMode, LoadingIndicator, LoadingOptions, LoadingState, FRAME_COUNT,
};
pub use producer::{
    ProducerContext, ProducerEvent, ProducerId, ProducerOutcome, ProducerPool, StopReport,
};
pub use scheduler::{Scheduler, Timer, TimerQueue};
pub use scroll::{ScrollState, ScrollTracker, DEFAULT_BOTTOM_EPSILON};
pub use sink::{GuiLogger, LogSink};
pub use surface::{DisplaySurface, LineId, MemorySurface, RenderFault, DEFAULT_MAX_LINES};
pub use widget::LogWidget;
