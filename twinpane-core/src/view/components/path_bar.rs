//! src/view/components/path_bar.rs
//!
//! Top row: `user@host:` followed by the directory of the selected entry,
//! home abbreviated to `~`.

use std::path::Path;

use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Widget};

use crate::identity::Identity;
use crate::view::theme;

pub struct PathBar<'a> {
    identity: &'a Identity,
    dir: &'a Path,
}

impl<'a> PathBar<'a> {
    #[must_use]
    pub const fn new(identity: &'a Identity, dir: &'a Path) -> Self {
        Self { identity, dir }
    }
}

impl Widget for PathBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = Line::from(vec![
            Span::styled(self.identity.prompt(), theme::prompt_style()),
            Span::styled(self.identity.abbreviate(self.dir), theme::path_style()),
        ]);
        Paragraph::new(line).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn prompt_then_abbreviated_dir() {
        let identity = Identity {
            user: "ann".into(),
            host: "box".into(),
            home: Some(PathBuf::from("/home/ann")),
        };
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);

        PathBar::new(&identity, Path::new("/home/ann/src")).render(area, &mut buf);

        let text: String = (0..area.width).map(|x| buf[(x, 0)].symbol()).collect();
        assert_eq!(text, "ann@box:~/src       ");
    }
}
