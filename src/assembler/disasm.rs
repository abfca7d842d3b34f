//! Bit-exact textual views of an assembled program: a disassembly listing
//! and a barrel stud-layout grid, matching the source's
//! `disassemble()`/`showverticals()` output byte for byte.

use std::fmt::Write;

use super::program::Program;
use super::stud::{StudTable, MOVE1, MOVE2, MOVE4, MOVEBACK};

const MAX_STUD_WIDTH: usize = 80;

impl Program {
    pub fn disassemble(&self, table: &StudTable) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "\n------ disassembly of {} ------", self.name);
        let namewidth = 1 + self.max_label_width();
        let _ = writeln!(
            out,
            "{:>lw$}{:<sw$}--> jumps to",
            "label   vert",
            "      studs",
            lw = namewidth + 5,
            sw = MAX_STUD_WIDTH
        );
        for (vertnum, vert) in self.verticals.iter().enumerate() {
            let label = self.label_at(vertnum).unwrap_or(" ");
            let _ = write!(out, "{:>lw$} {:>3}  ", label, vertnum, lw = namewidth);
            let mut studwidth = 0usize;
            let mut did_one = false;
            for stud in table.iter() {
                if stud.id.0 < table.first_user_stud().0 {
                    continue;
                }
                if !vert.is_on(stud.id) {
                    continue;
                }
                if did_one {
                    let _ = write!(out, ", ");
                }
                if studwidth > MAX_STUD_WIDTH.saturating_sub(14) {
                    let _ = writeln!(out);
                    let _ = write!(out, "{:>w$}", " ", w = namewidth + 6);
                    studwidth = 0;
                }
                let _ = write!(out, "{}", stud.name);
                did_one = true;
                studwidth += stud.name.len() + 2;
            }
            let default_pattern = vert.stud_number(MOVE1) == MOVE1.on()
                && vert.stud_number(MOVE2) == MOVE2.off()
                && vert.stud_number(MOVE4) == MOVE4.off()
                && vert.stud_number(MOVEBACK) == MOVEBACK.off();
            if !default_pattern || self.skip_verticals.contains(&vertnum) {
                let mut distance: i64 = 0;
                if vert.stud_number(MOVE1) == MOVE1.on() {
                    distance += 1;
                }
                if vert.stud_number(MOVE2) == MOVE2.on() {
                    distance += 2;
                }
                if vert.stud_number(MOVE4) == MOVE4.on() {
                    distance += 4;
                }
                if vert.stud_number(MOVEBACK) == MOVEBACK.on() {
                    distance = -distance;
                }
                let mut target = vertnum as i64 + distance;
                let mut targetname = self
                    .label_at(target as usize)
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| target.to_string());
                if self.skip_verticals.contains(&vertnum) {
                    let extra = if vert.stud_number(MOVEBACK) == MOVEBACK.off() {
                        target += 1;
                        "+1"
                    } else {
                        target -= 1;
                        "-1"
                    };
                    targetname = format!("{} or {}{}", targetname, targetname, extra);
                    if target >= 0 {
                        if let Some(name) = self.label_at(target as usize) {
                            targetname = format!("{} ({})", targetname, name);
                        }
                    }
                }
                if studwidth < MAX_STUD_WIDTH {
                    let _ = write!(out, "{:w$}", " ", w = MAX_STUD_WIDTH - studwidth);
                }
                let _ = write!(out, " --> {}", targetname);
            }
            let _ = writeln!(out);
        }
        out
    }

    pub fn show_verticals(&self, table: &StudTable) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "\n------  layout of studs on the {} barrel ------",
            self.name
        );
        let namewidth = 1 + table.iter().map(|s| s.name.len()).max().unwrap_or(0);
        let _ = write!(out, "{:w$}", "stud", w = namewidth + 11);
        for vert in 0..self.verticals.len() {
            let _ = write!(out, "{:>5}", vert);
        }
        let _ = writeln!(out);
        let total = table.len() as u32 * 2;
        for studnum in (0..total).rev() {
            let pair = (studnum / 2) as usize;
            let is_off_row = studnum % 2 == 1;
            let name_col = if is_off_row {
                table.iter().nth(pair).unwrap().name.clone()
            } else {
                " ".repeat(namewidth)
            };
            let _ = write!(out, "{:>3} {:>nw$} ", studnum, name_col, nw = namewidth);
            let _ = write!(out, "{}", if !is_off_row { " ON " } else { " OFF" });
            let _ = write!(out, "___");
            let mut used = false;
            for vert in &self.verticals {
                let present = vert.resolved.as_ref().unwrap()[pair] == studnum;
                let _ = write!(out, "{}", if present { "__*__" } else { "_____" });
                used |= present;
            }
            if !is_off_row && !used {
                let _ = write!(out, "unused");
            }
            let _ = writeln!(out);
        }
        out
    }

    fn max_label_width(&self) -> usize {
        self.defined_label_names()
            .map(|n| n.len())
            .max()
            .unwrap_or(0)
    }

    fn defined_label_names(&self) -> impl Iterator<Item = &str> {
        (0..self.verticals.len()).filter_map(|v| self.label_at(v))
    }
}
