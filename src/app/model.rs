use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::brand::{self, Brand};
use crate::document::{self, Document, RenderDescriptor};
use crate::editor::{LineField, SourceBuffer};
use crate::theme::ThemeId;
use crate::ui::viewport::Viewport;

/// Title shown in the header band until the user changes it.
pub const DEFAULT_TITLE: &str = "代码片段";

/// Terminal width at which the editor and preview are shown side by side.
pub const WIDE_BREAKPOINT: u16 = 100;

const TOAST_TTL: Duration = Duration::from_secs(4);

/// Source text the editor starts with when no file is given.
pub const WELCOME: &str = r#"# 欢迎使用 AI分享助手 📸

在此粘贴您的 **Markdown** 内容，将其转换为精美的图片以便分享。

## 为什么使用它？
1. **保留格式**：分享时不再出现表格或代码块错乱的问题。
2. **美观主题**：选择适合您心情的样式。
3. **AI 品牌**：支持添加常见 AI 模型的水印。

### 代码示例
```javascript
const sayHello = (name) => {
  console.log(`你好, ${name}!`);
};
```

### 比较表

| 功能 | 纯文本 | AI分享助手 |
| :--- | :---: | :---: |
| 粗体/斜体 | ❌ | ✅ |
| 表格 | ❌ | ✅ |
| 语法高亮 | ❌ | ✅ |

> “设计不仅仅是外观和感觉，设计是它的运作方式。”
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Which input receives typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Source,
    Title,
    Author,
}

impl Focus {
    pub const fn next(self) -> Self {
        match self {
            Self::Source => Self::Title,
            Self::Title => Self::Author,
            Self::Author => Self::Source,
        }
    }

    pub const fn previous(self) -> Self {
        match self {
            Self::Source => Self::Author,
            Self::Title => Self::Source,
            Self::Author => Self::Title,
        }
    }
}

/// The pane shown on narrow terminals. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    Editor,
    Preview,
}

impl Pane {
    pub const fn other(self) -> Self {
        match self {
            Self::Editor => Self::Preview,
            Self::Preview => Self::Editor,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Editor => "编辑",
            Self::Preview => "预览",
        }
    }
}

/// The complete application state.
///
/// All state lives here, no global or scattered state. The rendered
/// [`Document`] is derived from the other fields and refreshed by
/// [`Model::rerender`] whenever one of them changes.
pub struct Model {
    pub source: SourceBuffer,
    pub theme: ThemeId,
    pub brand_id: &'static str,
    pub title: LineField,
    pub author: LineField,
    pub focus: Focus,
    pub pane: Pane,
    /// Terminal size in cells.
    pub width: u16,
    pub height: u16,
    /// True while an export is in flight.
    pub exporting: bool,
    /// Set when `update` accepted an export request; the side-effect
    /// handler takes it and starts the worker.
    export_requested: bool,
    document: Document,
    pub preview: Viewport,
    pub editor_scroll_offset: usize,
    /// Directory exports are written to, shown in help.
    pub out_dir: PathBuf,
    pub config_global_path: Option<PathBuf>,
    pub config_local_path: Option<PathBuf>,
    pub help_visible: bool,
    toast: Option<Toast>,
    pub should_quit: bool,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("theme", &self.theme)
            .field("brand_id", &self.brand_id)
            .field("focus", &self.focus)
            .field("pane", &self.pane)
            .field("exporting", &self.exporting)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a model for `source` in a terminal of `size` (columns, rows).
    pub fn new(source: &str, size: (u16, u16)) -> Self {
        let mut model = Self::blank(size);
        model.source = SourceBuffer::from_text(source);
        model.rerender();
        model
    }

    /// An empty model with nothing rendered beyond the frame.
    fn blank(size: (u16, u16)) -> Self {
        Self {
            source: SourceBuffer::empty(),
            theme: ThemeId::Light,
            brand_id: brand::none().id,
            title: LineField::new(DEFAULT_TITLE),
            author: LineField::default(),
            focus: Focus::Source,
            pane: Pane::Editor,
            width: size.0,
            height: size.1,
            exporting: false,
            export_requested: false,
            document: document::render(&RenderDescriptor::new("", ThemeId::Light.theme())),
            preview: Viewport::new(size.0, size.1, 0),
            editor_scroll_offset: 0,
            out_dir: PathBuf::from("."),
            config_global_path: None,
            config_local_path: None,
            help_visible: false,
            toast: None,
            should_quit: false,
        }
    }

    #[must_use]
    pub fn with_theme(mut self, theme: ThemeId) -> Self {
        self.theme = theme;
        self.rerender();
        self
    }

    /// Select a brand by id; unknown ids fall back to `none`.
    #[must_use]
    pub fn with_brand(mut self, id: &str) -> Self {
        self.brand_id = brand::resolve(id).id;
        self.rerender();
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: &str) -> Self {
        self.title.set(title);
        self.rerender();
        self
    }

    #[must_use]
    pub fn with_author(mut self, author: &str) -> Self {
        self.author.set(author);
        self.rerender();
        self
    }

    /// The rendered document for the current state.
    pub const fn document(&self) -> &Document {
        &self.document
    }

    pub fn brand(&self) -> &'static Brand {
        brand::resolve(self.brand_id)
    }

    /// Both panes fit side by side.
    pub const fn is_wide(&self) -> bool {
        self.width >= WIDE_BREAKPOINT
    }

    /// Whether the editor pane is on screen.
    pub const fn editor_visible(&self) -> bool {
        self.is_wide() || matches!(self.pane, Pane::Editor)
    }

    /// Whether the preview pane is on screen.
    pub const fn preview_visible(&self) -> bool {
        self.is_wide() || matches!(self.pane, Pane::Preview)
    }

    /// Re-derive the rendered document from the current inputs.
    pub fn rerender(&mut self) {
        let text = self.source.text();
        let theme = self.theme.theme();
        let descriptor = RenderDescriptor::new(&text, theme)
            .with_title(self.title.as_str())
            .with_author(self.author.as_str())
            .with_brand(self.brand());
        self.document = document::render(&descriptor);
    }

    pub(super) const fn request_export(&mut self) -> bool {
        if self.exporting {
            return false;
        }
        self.exporting = true;
        self.export_requested = true;
        true
    }

    /// Take a pending export request, if `update` accepted one.
    pub(super) const fn take_export_request(&mut self) -> bool {
        let requested = self.export_requested;
        self.export_requested = false;
        requested
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

// Implement Default for Model to allow std::mem::take
impl Default for Model {
    fn default() -> Self {
        Self::blank((80, 24))
    }
}
