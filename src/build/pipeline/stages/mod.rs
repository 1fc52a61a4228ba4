//! Default pipeline stages.
//!
//! The standard page pipeline consists of:
//!
//! 1. **LoadStage** - Parse the host page and read the embedded payload
//! 2. **SanitizeStage** - Render the payload to trusted HTML in `#content`
//! 3. **AccordionStage** - Turn Q&A headings into collapsible widgets
//! 4. **HighlightStage** - Highlight code blocks, mark diagram containers
//! 5. **TocStage** - Assign anchor ids and fill `#toc-list`
//! 6. **ScrollStage** - Annotate the outline for scroll tracking
//! 7. **WriteStage** - Serialize and write the page

mod accordion;
mod highlight;
mod load;
mod sanitize;
mod scroll;
mod toc;
mod write;

pub use accordion::AccordionStage;
pub use highlight::HighlightStage;
pub use load::LoadStage;
pub use sanitize::SanitizeStage;
pub use scroll::ScrollStage;
pub use toc::TocStage;
pub use write::WriteStage;
