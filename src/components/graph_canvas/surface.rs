//! The slice of the 2D canvas API the renderer draws through.
//!
//! `CanvasRenderingContext2d` implements it directly. Tests use a recorder
//! so draw calls can be asserted without a browser.

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

pub trait Surface {
	fn save(&self);
	fn restore(&self);
	fn clear_rect(&self, x: f64, y: f64, w: f64, h: f64);
	fn translate(&self, x: f64, y: f64);
	fn scale(&self, x: f64, y: f64);
	fn begin_path(&self);
	fn move_to(&self, x: f64, y: f64);
	fn line_to(&self, x: f64, y: f64);
	fn arc(&self, x: f64, y: f64, radius: f64);
	fn stroke(&self);
	fn fill(&self);
	fn fill_text(&self, text: &str, x: f64, y: f64);
	fn set_stroke_style(&self, color: &str);
	fn set_fill_style(&self, color: &str);
	fn set_line_width(&self, width: f64);
	/// An empty slice restores solid lines.
	fn set_line_dash(&self, segments: &[f64]);
	fn set_font(&self, font: &str);
	fn set_text_align(&self, align: &str);
	fn set_text_baseline(&self, baseline: &str);
	fn measure_text(&self, text: &str) -> f64;
}

impl Surface for CanvasRenderingContext2d {
	fn save(&self) {
		CanvasRenderingContext2d::save(self);
	}

	fn restore(&self) {
		CanvasRenderingContext2d::restore(self);
	}

	fn clear_rect(&self, x: f64, y: f64, w: f64, h: f64) {
		CanvasRenderingContext2d::clear_rect(self, x, y, w, h);
	}

	fn translate(&self, x: f64, y: f64) {
		let _ = CanvasRenderingContext2d::translate(self, x, y);
	}

	fn scale(&self, x: f64, y: f64) {
		let _ = CanvasRenderingContext2d::scale(self, x, y);
	}

	fn begin_path(&self) {
		CanvasRenderingContext2d::begin_path(self);
	}

	fn move_to(&self, x: f64, y: f64) {
		CanvasRenderingContext2d::move_to(self, x, y);
	}

	fn line_to(&self, x: f64, y: f64) {
		CanvasRenderingContext2d::line_to(self, x, y);
	}

	fn arc(&self, x: f64, y: f64, radius: f64) {
		let _ = CanvasRenderingContext2d::arc(self, x, y, radius, 0.0, std::f64::consts::TAU);
	}

	fn stroke(&self) {
		CanvasRenderingContext2d::stroke(self);
	}

	fn fill(&self) {
		CanvasRenderingContext2d::fill(self);
	}

	fn fill_text(&self, text: &str, x: f64, y: f64) {
		let _ = CanvasRenderingContext2d::fill_text(self, text, x, y);
	}

	fn set_stroke_style(&self, color: &str) {
		self.set_stroke_style_str(color);
	}

	fn set_fill_style(&self, color: &str) {
		self.set_fill_style_str(color);
	}

	fn set_line_width(&self, width: f64) {
		CanvasRenderingContext2d::set_line_width(self, width);
	}

	fn set_line_dash(&self, segments: &[f64]) {
		let dash: js_sys::Array = segments.iter().map(|s| JsValue::from_f64(*s)).collect();
		let _ = CanvasRenderingContext2d::set_line_dash(self, &dash);
	}

	fn set_font(&self, font: &str) {
		CanvasRenderingContext2d::set_font(self, font);
	}

	fn set_text_align(&self, align: &str) {
		CanvasRenderingContext2d::set_text_align(self, align);
	}

	fn set_text_baseline(&self, baseline: &str) {
		CanvasRenderingContext2d::set_text_baseline(self, baseline);
	}

	fn measure_text(&self, text: &str) -> f64 {
		CanvasRenderingContext2d::measure_text(self, text)
			.map(|m| m.width())
			.unwrap_or(0.0)
	}
}

#[cfg(test)]
pub(crate) mod recording {
	use std::cell::RefCell;

	use super::Surface;

	#[derive(Clone, Debug, PartialEq)]
	pub enum Op {
		Save,
		Restore,
		Clear(f64, f64, f64, f64),
		Translate(f64, f64),
		Scale(f64, f64),
		BeginPath,
		MoveTo(f64, f64),
		LineTo(f64, f64),
		Arc(f64, f64, f64),
		Stroke,
		Fill,
		Text(String, f64, f64),
		StrokeStyle(String),
		FillStyle(String),
		LineWidth(f64),
		Dash(Vec<f64>),
		Font(String),
		Align(String),
		Baseline(String),
	}

	/// Records every call. Text is measured at 8 px per character.
	#[derive(Default)]
	pub struct RecordingSurface {
		pub ops: RefCell<Vec<Op>>,
	}

	impl RecordingSurface {
		pub fn ops(&self) -> Vec<Op> {
			self.ops.borrow().clone()
		}

		fn push(&self, op: Op) {
			self.ops.borrow_mut().push(op);
		}
	}

	impl Surface for RecordingSurface {
		fn save(&self) {
			self.push(Op::Save);
		}
		fn restore(&self) {
			self.push(Op::Restore);
		}
		fn clear_rect(&self, x: f64, y: f64, w: f64, h: f64) {
			self.push(Op::Clear(x, y, w, h));
		}
		fn translate(&self, x: f64, y: f64) {
			self.push(Op::Translate(x, y));
		}
		fn scale(&self, x: f64, y: f64) {
			self.push(Op::Scale(x, y));
		}
		fn begin_path(&self) {
			self.push(Op::BeginPath);
		}
		fn move_to(&self, x: f64, y: f64) {
			self.push(Op::MoveTo(x, y));
		}
		fn line_to(&self, x: f64, y: f64) {
			self.push(Op::LineTo(x, y));
		}
		fn arc(&self, x: f64, y: f64, radius: f64) {
			self.push(Op::Arc(x, y, radius));
		}
		fn stroke(&self) {
			self.push(Op::Stroke);
		}
		fn fill(&self) {
			self.push(Op::Fill);
		}
		fn fill_text(&self, text: &str, x: f64, y: f64) {
			self.push(Op::Text(text.to_string(), x, y));
		}
		fn set_stroke_style(&self, color: &str) {
			self.push(Op::StrokeStyle(color.to_string()));
		}
		fn set_fill_style(&self, color: &str) {
			self.push(Op::FillStyle(color.to_string()));
		}
		fn set_line_width(&self, width: f64) {
			self.push(Op::LineWidth(width));
		}
		fn set_line_dash(&self, segments: &[f64]) {
			self.push(Op::Dash(segments.to_vec()));
		}
		fn set_font(&self, font: &str) {
			self.push(Op::Font(font.to_string()));
		}
		fn set_text_align(&self, align: &str) {
			self.push(Op::Align(align.to_string()));
		}
		fn set_text_baseline(&self, baseline: &str) {
			self.push(Op::Baseline(baseline.to_string()));
		}
		fn measure_text(&self, text: &str) -> f64 {
			text.chars().count() as f64 * 8.0
		}
	}
}
