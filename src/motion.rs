#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Debug)]
pub struct CursorTrail {
    rendered: Point,
    target: Point,
    lag: f64,
}

impl CursorTrail {
    pub fn new(rendered: Point, target: Point, lag: f64) -> Self {
        Self {
            rendered,
            target,
            lag,
        }
    }

    pub fn centered(viewport_width: f64, viewport_height: f64, lag: f64) -> Self {
        let centre = Point::new(viewport_width / 2.0, viewport_height / 2.0);
        Self::new(centre, centre, lag)
    }

    pub fn set_target(&mut self, x: f64, y: f64) {
        self.target = Point::new(x, y);
    }

    pub fn step(&mut self) -> Point {
        self.rendered.x += (self.target.x - self.rendered.x) * self.lag;
        self.rendered.y += (self.target.y - self.rendered.y) * self.lag;
        self.rendered
    }

    pub fn rendered(&self) -> Point {
        self.rendered
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollDirection {
    Left,
    Right,
}

impl ScrollDirection {
    // The midpoint itself scrolls right.
    pub fn from_click(click_x: f64, viewport_width: f64) -> Self {
        if click_x < viewport_width / 2.0 {
            Self::Left
        } else {
            Self::Right
        }
    }

    pub fn offset(self, step: f64) -> f64 {
        match self {
            Self::Left => -step,
            Self::Right => step,
        }
    }
}

pub fn halo_position(local_x: f64, local_y: f64, width: f64, height: f64) -> Option<Point> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }

    Some(Point::new(local_x / width * 100.0, local_y / height * 100.0))
}

pub fn css_percent(value: f64) -> String {
    format!("{value:.2}%")
}

pub fn css_px(value: f64) -> String {
    format!("{value:.2}px")
}

pub fn looped_content(original: &str) -> String {
    let mut looped = String::with_capacity(original.len() * 2);
    looped.push_str(original);
    looped.push_str(original);
    looped
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResumeToken(u64);

#[derive(Debug, Default)]
pub struct MarqueePlayback {
    paused: bool,
    generation: u64,
}

impl MarqueePlayback {
    pub fn on_click(&mut self, on_chip: bool) -> Option<ResumeToken> {
        if !on_chip {
            return None;
        }

        self.paused = true;
        self.generation += 1;
        Some(ResumeToken(self.generation))
    }

    pub fn resume(&mut self, token: ResumeToken) -> bool {
        if !self.paused || token.0 != self.generation {
            return false;
        }

        self.paused = false;
        true
    }

    #[cfg(test)]
    pub fn is_paused(&self) -> bool {
        self.paused
    }
}
