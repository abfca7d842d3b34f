/// A small signed up/down counter, self-clearing its `driven` flag each
/// time unit like every other gear-backed component.
#[derive(Debug, Clone)]
pub struct Counter {
    pub value: i32,
    pub max: i32,
    pub running_up: bool,
    pub driven: bool,
}

impl Counter {
    pub fn new(max: i32) -> Self {
        Counter {
            value: 0,
            max,
            running_up: false,
            driven: false,
        }
    }

    pub fn clear(&mut self) {
        self.value = 0;
        self.running_up = false;
    }

    /// Advance by one count in `direction`, wrapping modulo `max + 1` and
    /// setting `running_up` on wraparound. `running_up` is never reset on
    /// a non-wraparound step, matching the source: it stays set until the
    /// next wraparound or an explicit `clear()`.
    pub fn advance(&mut self, up: bool) {
        if up {
            if self.value == self.max {
                self.value = 0;
                self.running_up = true;
            } else {
                self.value += 1;
            }
        } else if self.value == 0 {
            self.value = self.max;
            self.running_up = true;
        } else {
            self.value -= 1;
        }
        self.driven = false;
    }
}
