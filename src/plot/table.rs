// Copyright 2022 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::{render_error, DEJAVU_SANS_MONO, GREY};
use crate::summary::COLUMNS;
use crate::{Result, Summary};

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

const MAX_ROW_HEIGHT: i32 = 36;

/// Draw the summary as a borderless table filling `area`, header first.
pub fn draw<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, summary: &Summary) -> Result<()> {
    let table = summary.table();
    let (width, height) = area.dim_in_pixel();
    let (width, height) = (width as i32, height as i32);

    let rows = table.len() as i32;
    let row_height = (height / (rows + 1)).min(MAX_ROW_HEIGHT);
    let top = (height - row_height * rows) / 2;
    let column_width = width / COLUMNS.len() as i32;

    let centre = Pos::new(HPos::Center, VPos::Center);
    let header = (DEJAVU_SANS_MONO, 15).into_font().color(&BLACK).pos(centre);
    let cell = (DEJAVU_SANS_MONO, 14).into_font().color(&BLACK).pos(centre);

    for (r, row) in table.iter().enumerate() {
        let style = if r == 0 { &header } else { &cell };
        let y = top + row_height * r as i32 + row_height / 2;
        for (c, text) in row.iter().enumerate() {
            let x = column_width * c as i32 + column_width / 2;
            area.draw(&Text::new(text.as_str(), (x, y), style.clone()))
                .map_err(render_error)?;
        }
    }

    let rule = top + row_height;
    area.draw(&PathElement::new(
        vec![(column_width / 4, rule), (width - column_width / 4, rule)],
        GREY.stroke_width(1),
    ))
    .map_err(render_error)?;

    Ok(())
}
