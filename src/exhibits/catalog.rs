//! Exhibit catalogue
//!
//! Every exhibit is an id, an output file stem, a one-line summary and a
//! builder turning the shared tables into a `Figure`. Builders only read the
//! dataset and compute callout values through `metrics`.

use super::data::{AdoptionSeries, Dataset, PillarStatus};
use super::error::{ExhibitError, Result};
use super::figure::{
    Align, Anchor, Annotation, BarChart, BarSeries, Body, CalloutPanel, Figure, LegendPosition,
    LineChart, LineOverlay, LineSeries, Paint, RangeChart, ScorecardTable, ValueAxis, ValueFormat,
};
use super::metrics::{
    conversion_rate, cumulative, format_rate_pct, format_thousands, headroom, max_value, ratio,
    DEFAULT_HEADROOM,
};

const NAVY: &str = "#003366";
const LIGHT_BLUE: &str = "#ADD8E6";
const PIX_GREEN: &str = "#28A745";
const CODI_BLUE: &str = "#005B9A";

const YEARS_SINCE_LAUNCH: &str = "Año desde el lanzamiento";
const TABLE4_SOURCE: &str =
    "Fuente: Tabla 4 – proyección México a 5 años (ahorros USD, ΔPIB, usuarios).";

/// One entry of the catalogue
#[derive(Debug, Clone, Copy)]
pub struct Exhibit {
    pub id: &'static str,
    pub file_stem: &'static str,
    pub summary: &'static str,
    builder: fn(&Exhibit, &Dataset) -> Result<Figure>,
}

impl Exhibit {
    /// Build the figure from the tables and check its shape
    pub fn build(&self, data: &Dataset) -> Result<Figure> {
        let figure = (self.builder)(self, data)?;
        figure.validate()?;
        Ok(figure)
    }
}

static CATALOG: [Exhibit; 16] = [
    Exhibit {
        id: "1",
        file_stem: "Exhibit1_Paradoja_Adopcion_CoDi_DiMo",
        summary: "Adoption paradox: awareness vs active use with conversion rates",
        builder: adoption_paradox,
    },
    Exhibit {
        id: "1-funnel",
        file_stem: "Exhibit1_Embudo_Conocimiento_Activacion_Uso",
        summary: "Adoption funnel: awareness, use and activation on twin axes",
        builder: adoption_funnel,
    },
    Exhibit {
        id: "2",
        file_stem: "Exhibit2_Brecha_Ordenes_Magnitud",
        summary: "Orders-of-magnitude gap: Pix in one day vs CoDi cumulative",
        builder: transaction_gap,
    },
    Exhibit {
        id: "3",
        file_stem: "Exhibit3_Impuesto_Invisible_MDR",
        summary: "Invisible tax: merchant discount rate by acceptance method",
        builder: invisible_tax,
    },
    Exhibit {
        id: "3-ranges",
        file_stem: "Exhibit3_Costo_Aceptacion",
        summary: "Acceptance cost ranges with SME scenario",
        builder: acceptance_cost_ranges,
    },
    Exhibit {
        id: "4",
        file_stem: "Exhibit4_Dividendo_Digital",
        summary: "Digital dividend already realised in Brazil",
        builder: digital_dividend,
    },
    Exhibit {
        id: "5",
        file_stem: "Exhibit5_PIB_Contribucion",
        summary: "Projected Pix contribution to Brazil's GDP",
        builder: brazil_gdp,
    },
    Exhibit {
        id: "5-mx",
        file_stem: "Exhibit5_Impacto_PIB_Mexico",
        summary: "Projected cumulative GDP impact in Mexico with external validation",
        builder: mexico_gdp_impact,
    },
    Exhibit {
        id: "6",
        file_stem: "Exhibit6_Inclusion_Formalizacion",
        summary: "Inclusion and formalization: new users and informality",
        builder: inclusion_formalization,
    },
    Exhibit {
        id: "6.1",
        file_stem: "Exhibit6_1_Inclusion_Financiera",
        summary: "Cumulative new individuals in the financial system",
        builder: financial_inclusion,
    },
    Exhibit {
        id: "7",
        file_stem: "Exhibit7_Scorecard_Estrategica",
        summary: "Strategic pillar scorecard, Brazil vs Mexico",
        builder: strategic_scorecard,
    },
    Exhibit {
        id: "8",
        file_stem: "Exhibit8_Caso_MX_5anios",
        summary: "Mexico business case: savings, GDP growth and users",
        builder: mexico_business_case,
    },
    Exhibit {
        id: "9.1",
        file_stem: "Exhibit9_1_Ahorros_Anuales_USD",
        summary: "Annual savings with five-year cumulative",
        builder: annual_savings,
    },
    Exhibit {
        id: "9.2",
        file_stem: "Exhibit9_2_Contribucion_PIB",
        summary: "Additional GDP growth with Brazil benchmark",
        builder: gdp_contribution,
    },
    Exhibit {
        id: "9.3",
        file_stem: "Exhibit9_3_Nuevos_Usuarios",
        summary: "New individuals in the financial system (millions)",
        builder: new_users,
    },
    Exhibit {
        id: "10",
        file_stem: "Exhibit10_Trayectorias_Adopcion",
        summary: "Divergent adoption trajectories, Pix vs CoDi",
        builder: adoption_trajectories,
    },
];

/// All exhibits in catalogue order
pub fn catalog() -> &'static [Exhibit] {
    &CATALOG
}

pub fn find(id: &str) -> Option<&'static Exhibit> {
    CATALOG.iter().find(|e| e.id == id)
}

/// Resolve requested ids; an empty request selects everything
///
/// The result follows catalogue order and holds each exhibit once.
pub fn select<S: AsRef<str>>(ids: &[S]) -> Result<Vec<&'static Exhibit>> {
    if ids.is_empty() {
        return Ok(CATALOG.iter().collect());
    }

    for id in ids {
        if find(id.as_ref()).is_none() {
            return Err(ExhibitError::UnknownExhibit(id.as_ref().to_string()));
        }
    }

    Ok(CATALOG
        .iter()
        .filter(|e| ids.iter().any(|id| id.as_ref() == e.id))
        .collect())
}

fn year_labels(years: &[u8]) -> Vec<String> {
    years.iter().map(|y| y.to_string()).collect()
}

fn adoption_paradox(exhibit: &Exhibit, data: &Dataset) -> Result<Figure> {
    let systems: Vec<String> = data.enif.iter().map(|r| r.system.to_string()).collect();
    let awareness: Vec<f64> = data.enif.iter().map(|r| r.awareness_pct).collect();
    let usage: Vec<f64> = data.enif.iter().map(|r| r.usage_pct).collect();

    let chart = BarChart::vertical(
        systems,
        ValueAxis::new("% de la población adulta", 0.0, 60.0),
    )
    .group_width(0.72)
    .series(
        BarSeries::new(&awareness, Paint::brand(0, NAVY))
            .label("Conocimiento")
            .value_format(ValueFormat::Percent(1)),
    )
    .series(
        BarSeries::new(&usage, Paint::brand(1, LIGHT_BLUE))
            .label("Uso Activo (≥1 vez)")
            .edge(Paint::brand(0, NAVY))
            .value_format(ValueFormat::Percent(1)),
    );

    let mut figure = Figure::new(
        exhibit.id,
        exhibit.file_stem,
        "Exhibit 1: La Paradoja de la Adopción – Abismo entre Conocimiento y Uso (México, 2024)",
        (10.0, 6.0),
        Body::Bars(chart),
    )
    .legend(LegendPosition::UpperRight)
    .footnote(
        "Fuente: ENIF 2024 (INEGI–CNBV), Tabla 1. \
         Definición: Tasa de conversión = Uso / Conocimiento.",
    );

    for (i, row) in data.enif.iter().enumerate() {
        if let Some(rate) = conversion_rate(row.usage_pct, row.awareness_pct) {
            let top = row.awareness_pct.max(row.usage_pct);
            figure = figure.annotate(
                Annotation::text(
                    format!("Tasa de Conversión: {:.1}%", rate),
                    Anchor::Data(i as f64, top + 9.0),
                )
                .boxed()
                .size(12.0)
                .paint(Paint::brand(0, NAVY)),
            );
        }
    }

    Ok(figure)
}

fn adoption_funnel(exhibit: &Exhibit, data: &Dataset) -> Result<Figure> {
    let systems: Vec<String> = data.enif.iter().map(|r| r.system.to_string()).collect();
    let awareness: Vec<f64> = data.enif.iter().map(|r| r.awareness_pct).collect();
    let usage: Vec<f64> = data.enif.iter().map(|r| r.usage_pct).collect();
    let activation: Vec<f64> = data.enif.iter().map(|r| r.activation_m).collect();

    let left_max = headroom(max_value(&awareness).max(max_value(&usage)), 1.35);
    let right_max = headroom(max_value(&activation), 1.5);

    let chart = BarChart::vertical(
        systems,
        ValueAxis::new("Porcentaje (ENIF 2024)", 0.0, left_max),
    )
    .group_width(0.66)
    .series(
        BarSeries::new(&awareness, Paint::slot(0))
            .label("Conocimiento (%)")
            .value_format(ValueFormat::Percent(1)),
    )
    .series(
        BarSeries::new(&usage, Paint::slot(1))
            .label("Uso activo (≥1 vez) entre quienes conocen (%)")
            .edge(Paint::brand(7, "#000000"))
            .value_format(ValueFormat::Percent(1)),
    )
    .series(
        BarSeries::new(&activation, Paint::slot(2))
            .label("Activación (proxy, millones)")
            .value_format(ValueFormat::Millions(2))
            .on_secondary(),
    )
    .secondary_axis(
        ValueAxis::new("Activación (millones de usuarios/cuentas)", 0.0, right_max).without_grid(),
    );

    let mut figure = Figure::new(
        exhibit.id,
        exhibit.file_stem,
        "Embudo de adopción: Conocimiento, Activación y Uso (México, 2024)",
        (12.0, 7.0),
        Body::Bars(chart),
    )
    .title_pt(16.0)
    .legend(LegendPosition::UpperRight)
    .footnote(
        "Fuente: ENIF 2024 (INEGI–CNBV); activación: cuentas validadas y usuarios registrados \
         reportados por Banxico.",
    );

    // The use bar sits in the middle of each group of three
    for (i, row) in data.enif.iter().enumerate() {
        if let Some(rate) = conversion_rate(row.usage_pct, row.awareness_pct) {
            figure = figure.annotate(
                Annotation::text(
                    format!("Tasa de conversión: {:.1}%", rate),
                    Anchor::Data(i as f64, left_max * 0.80),
                )
                .arrow_to(Anchor::Data(i as f64, row.usage_pct))
                .boxed()
                .size(12.0),
            );
        }
    }

    Ok(figure)
}

fn transaction_gap(exhibit: &Exhibit, data: &Dataset) -> Result<Figure> {
    let gap = &data.transaction_gap;
    let values = [gap.codi_cumulative_m, gap.pix_single_day_m];

    let chart = BarChart::horizontal(
        vec![gap.codi_label.to_string(), gap.pix_label.to_string()],
        ValueAxis::new(
            "Transacciones (millones)",
            0.0,
            headroom(max_value(&values), 1.15),
        ),
    )
    .series(BarSeries::new(&values, Paint::slot(0)).value_format(ValueFormat::Millions(1)));

    let mut figure = Figure::new(
        exhibit.id,
        exhibit.file_stem,
        "Brecha de órdenes de magnitud — Pix en 1 día vs CoDi histórico (México)",
        (11.0, 6.0),
        Body::Bars(chart),
    )
    .title_pt(18.0);

    if let Some(r) = ratio(gap.pix_single_day_m, gap.codi_cumulative_m) {
        figure = figure.annotate(
            Annotation::text(format!("≈ {:.0}×", r), Anchor::Axes(0.5, 0.15))
                .boxed()
                .bold()
                .size(28.0),
        );
    }

    Ok(figure)
}

fn invisible_tax(exhibit: &Exhibit, data: &Dataset) -> Result<Figure> {
    let methods: Vec<String> = data.mdr.iter().map(|q| q.method.to_string()).collect();
    let values: Vec<f64> = data.mdr.iter().map(|q| q.pct).collect();
    let sme = &data.sme;

    let chart = BarChart::horizontal(
        methods,
        ValueAxis::new(
            "Costo por transacción (%)",
            0.0,
            headroom(max_value(&values), 1.28),
        ),
    )
    .series(BarSeries::new(&values, Paint::slot(0)).value_format(ValueFormat::Percent(2)));

    let callout = format!(
        "PYME con ${} MXN/mes:\nmigrar de {}% → {}%\nlibera ≈ ${} MXN/mes\n(≈ ${} MXN/año)",
        format_thousands(sme.monthly_sales_mxn),
        format_rate_pct(sme.card_rate),
        format_rate_pct(sme.instant_rate),
        format_thousands(sme.monthly_savings()),
        format_thousands(sme.annual_savings()),
    );

    // Arrow points at the bank card bar when the table still has one
    let target = data
        .mdr
        .get(1)
        .map(|q| Anchor::Data(q.pct, 1.0));

    let mut note = Annotation::text(callout, Anchor::Axes(0.70, 0.72))
        .align(Align::Left)
        .boxed()
        .size(12.0);
    if let Some(target) = target {
        note = note.arrow_to(target);
    }

    Ok(Figure::new(
        exhibit.id,
        exhibit.file_stem,
        "El ‘impuesto invisible’ de la aceptación — MDR comparado por método",
        (11.0, 6.0),
        Body::Bars(chart),
    )
    .title_pt(16.0)
    .annotate(note)
    .footnote("Fuente: Banxico (tasas de descuento); cotizaciones públicas de agregadores y BCB."))
}

fn acceptance_cost_ranges(exhibit: &Exhibit, data: &Dataset) -> Result<Figure> {
    let categories: Vec<String> = data
        .cost_ranges
        .iter()
        .map(|r| r.method.to_string())
        .collect();
    let ranges: Vec<(f64, f64)> = data
        .cost_ranges
        .iter()
        .map(|r| (r.midpoint(), r.half_range()))
        .collect();
    let highs: Vec<f64> = data.cost_ranges.iter().map(|r| r.high_pct).collect();
    let sme = &data.sme;

    let chart = RangeChart {
        categories,
        ranges,
        value_axis: ValueAxis::new(
            "Costo por transacción (%)",
            0.0,
            headroom(max_value(&highs), 1.1),
        ),
        paint: Paint::slot(0),
    };

    let scenario = format!(
        "Escenario PYME (ventas mensuales ${} MXN):\n\
         Ahorro al migrar de {}% a {}% ≈ ${} MXN/mes\n(≈ ${} MXN/año)",
        format_thousands(sme.monthly_sales_mxn),
        format_rate_pct(sme.card_rate),
        format_rate_pct(sme.instant_rate),
        format_thousands(sme.monthly_savings()),
        format_thousands(sme.annual_savings()),
    );

    Ok(Figure::new(
        exhibit.id,
        exhibit.file_stem,
        "Exhibit 3: El 'Impuesto Invisible' de la Aceptación de Pagos vs. Modelo de Bajo Costo",
        (10.0, 6.0),
        Body::Ranges(chart),
    )
    .annotate(
        Annotation::text(scenario, Anchor::Axes(0.97, 0.86))
            .align(Align::Right)
            .boxed()
            .size(10.0),
    )
    .footnote(
        "Fuente: 'Impacto Económico de Pix en Brasil' (tabla de costos comparativos y tasas \
         promedio); Banxico (tasas de descuento).",
    ))
}

fn digital_dividend(exhibit: &Exhibit, data: &Dataset) -> Result<Figure> {
    let dividend = &data.dividend;

    let panels = vec![
        CalloutPanel {
            rect: (0.10, 0.42, 0.80, 0.30),
            lines: vec![
                (
                    format!("${:.0} Mil Millones USD", dividend.accumulated_usd_bn),
                    28.0,
                    true,
                ),
                (
                    format!("Ahorro acumulado {} (MBC)", dividend.period),
                    12.0,
                    false,
                ),
            ],
        },
        CalloutPanel {
            rect: (0.15, 0.08, 0.70, 0.24),
            lines: vec![
                (
                    format!(
                        "Proyección {}: R${:.1} Mil Millones / año",
                        dividend.projection_year, dividend.projection_brl_bn
                    ),
                    14.0,
                    false,
                ),
                ("(Ahorro anual estimado por MBC)".to_string(), 11.0, false),
            ],
        },
    ];

    Ok(Figure::new(
        exhibit.id,
        exhibit.file_stem,
        "Exhibit 4: Dividendo Digital Ya Materializado",
        (10.0, 6.0),
        Body::Callouts(panels),
    )
    .title_pt(18.0)
    .footnote("Fuente: Movimento Brasil Competitivo (MBC), 2025."))
}

fn brazil_gdp(exhibit: &Exhibit, data: &Dataset) -> Result<Figure> {
    let gdp = &data.brazil_gdp;
    let categories = vec![gdp.pct_year.to_string(), gdp.value_year.to_string()];

    let value_max = headroom(gdp.value_brl_bn, DEFAULT_HEADROOM);
    let pct_max = headroom(gdp.pct_of_gdp, 1.2);

    let chart = BarChart::vertical(
        categories,
        ValueAxis::new("Aporte al PIB (R$ miles de millones)", 0.0, value_max),
    )
    .category_desc("Año")
    .group_width(0.6)
    .series(
        BarSeries::sparse(vec![None, Some(gdp.value_brl_bn)], Paint::slot(0))
            .label("Aporte al PIB (R$ bn)"),
    )
    .overlay(LineOverlay {
        label: Some("Contribución (% del PIB)".to_string()),
        values: vec![Some(gdp.pct_of_gdp), None],
        paint: Paint::slot(1),
    })
    .secondary_axis(ValueAxis::new("Contribución (% del PIB)", 0.0, pct_max).without_grid());

    Ok(Figure::new(
        exhibit.id,
        exhibit.file_stem,
        "Exhibit 5: Del Ahorro al Crecimiento – Contribución Proyectada al PIB de Brasil",
        (10.0, 6.0),
        Body::Bars(chart),
    )
    .legend(LegendPosition::UpperLeft)
    .annotate(
        Annotation::text(
            format!("{:.2}% del PIB (ACI, {})", gdp.pct_of_gdp, gdp.pct_year),
            Anchor::SecondaryData(0.35, gdp.pct_of_gdp * 1.08),
        )
        .align(Align::Left)
        .arrow_to(Anchor::SecondaryData(0.0, gdp.pct_of_gdp)),
    )
    .annotate(
        Annotation::text(
            format!("R${:.1} bn (ACI, {})", gdp.value_brl_bn, gdp.value_year),
            Anchor::Data(0.55, gdp.value_brl_bn * 1.1),
        )
        .align(Align::Right)
        .arrow_to(Anchor::Data(1.0, gdp.value_brl_bn)),
    )
    .footnote(
        "Fuente: ACI Worldwide/Cebr (proyección %PIB 2026 y aporte en R$ para 2028).",
    ))
}

fn mexico_gdp_impact(exhibit: &Exhibit, data: &Dataset) -> Result<Figure> {
    let mx = &data.mexico;
    let gdp = &data.brazil_gdp;
    let last = (mx.years.len() - 1) as f64;

    let chart = BarChart::vertical(
        year_labels(&mx.years),
        ValueAxis::new("Contribución adicional al PIB (%)", 0.0, 0.6),
    )
    .category_desc(YEARS_SINCE_LAUNCH)
    .series(
        BarSeries::new(&mx.delta_gdp_pct, Paint::slot(0)).value_format(ValueFormat::Percent(2)),
    );

    let validation = format!(
        "Validación externa:\nBrasil (Pix) — ACI/Cebr:\n• Hasta {:.2}% del PIB ({})\n• R$ {:.1} bn al PIB ({})",
        gdp.pct_of_gdp, gdp.pct_year, gdp.value_brl_bn, gdp.value_year
    );
    let last_value = mx.delta_gdp_pct[mx.delta_gdp_pct.len() - 1];

    Ok(Figure::new(
        exhibit.id,
        exhibit.file_stem,
        "Exhibit 5: Del Ahorro al Crecimiento — Proyección del Impacto Acumulativo en el PIB de México",
        (10.0, 6.0),
        Body::Bars(chart),
    )
    .annotate(
        Annotation::text(validation, Anchor::Data(1.0, 0.46))
            .boxed()
            .align(Align::Center)
            .arrow_to(Anchor::Data(last, last_value)),
    )
    .footnote(
        "Fuente: Proyección a 5 años (tabla interna); validación con ACI Worldwide & Cebr (2024) \
         y BIS (2024).",
    ))
}

fn inclusion_formalization(exhibit: &Exhibit, data: &Dataset) -> Result<Figure> {
    let mx = &data.mexico;
    let informality_min = mx
        .informality_delta_pct
        .iter()
        .copied()
        .fold(0.0, f64::min);

    let chart = BarChart::vertical(
        year_labels(&mx.years),
        ValueAxis::new(
            "Nuevos individuos en el sistema financiero (millones)",
            0.0,
            headroom(max_value(&mx.new_users_m), DEFAULT_HEADROOM),
        ),
    )
    .category_desc(YEARS_SINCE_LAUNCH)
    .group_width(0.6)
    .series(
        BarSeries::new(&mx.new_users_m, Paint::slot(0))
            .label("Nuevos individuos (millones)")
            .value_format(ValueFormat::Millions(0)),
    )
    .overlay(LineOverlay {
        label: Some("Reducción de la economía informal (% del PIB)".to_string()),
        values: mx.informality_delta_pct.iter().map(|v| Some(*v)).collect(),
        paint: Paint::slot(1),
    })
    .secondary_axis(
        ValueAxis::new(
            "Reducción de la economía informal (% del PIB)",
            -headroom(-informality_min, 1.2),
            0.0,
        )
        .without_grid(),
    );

    Ok(Figure::new(
        exhibit.id,
        exhibit.file_stem,
        "Exhibit 6: Inclusión y Formalización – Trayectoria a 5 Años (México)",
        (10.0, 6.0),
        Body::Bars(chart),
    )
    .legend(LegendPosition::UpperLeft)
    .footnote(
        "Fuente: Tabla de proyección a 5 años para México (ahorros, usuarios e informalidad).",
    ))
}

fn financial_inclusion(exhibit: &Exhibit, data: &Dataset) -> Result<Figure> {
    let mx = &data.mexico;

    let chart = BarChart::vertical(
        year_labels(&mx.years),
        ValueAxis::new("Millones de personas", 0.0, 20.0),
    )
    .category_desc(YEARS_SINCE_LAUNCH)
    .series(BarSeries::new(&mx.new_users_m, Paint::slot(0)).value_format(ValueFormat::Millions(0)));

    Ok(Figure::new(
        exhibit.id,
        exhibit.file_stem,
        "Exhibit 6.1 — Nuevos Individuos Incorporados al Sistema Financiero\n(Acumulado en Millones)",
        (8.0, 6.0),
        Body::Bars(chart),
    )
    .title_pt(12.0)
    .footnote("Fuente: Proyección a 5 años para México (tabla interna)."))
}

fn strategic_scorecard(exhibit: &Exhibit, data: &Dataset) -> Result<Figure> {
    let card = &data.scorecard;

    let table = ScorecardTable {
        header: "Pilar Estratégico".to_string(),
        rows: card.pillars.iter().map(|p| p.to_string()).collect(),
        columns: card.countries.iter().map(|c| c.to_string()).collect(),
        cells: card
            .status
            .iter()
            .map(|row| row.iter().map(|s| s.slot()).collect())
            .collect(),
        legend: PillarStatus::ALL
            .iter()
            .map(|s| (s.label().to_string(), s.slot()))
            .collect(),
    };

    Ok(Figure::new(
        exhibit.id,
        exhibit.file_stem,
        "Exhibit 7 — Scorecard de los Pilares Estratégicos para la Adopción Masiva",
        (12.0, 7.0),
        Body::Scorecard(table),
    )
    .title_pt(16.0)
    .footnote(
        "Marco de referencia: BIS Quarterly Review (Mar-2024) 'Fast payments: design and adoption' — \
         cuatro grupos de diseño (user focus, infrastructure, rules, governance).",
    )
    .footnote(
        "Validación Pix: mandato de grandes bancos y rol dual del BCB; costos a comercios ~0.22% \
         (BIS Bulletin 52, 2022; BIS QR 2024).",
    )
    .footnote(
        "CoDi/DiMo: 'sin comisiones' (Banxico/CoDi); gobernanza centralizada (Banxico); \
         interoperabilidad a nivel de infraestructura (SPEI) — apertura competitiva parcial.",
    ))
}

fn mexico_business_case(exhibit: &Exhibit, data: &Dataset) -> Result<Figure> {
    let mx = &data.mexico;
    let savings_max = headroom(max_value(&mx.savings_usd_bn), DEFAULT_HEADROOM);

    let chart = BarChart::vertical(
        year_labels(&mx.years),
        ValueAxis::new("Ahorro anual (USD miles de millones)", 0.0, savings_max),
    )
    .category_desc(YEARS_SINCE_LAUNCH)
    .group_width(0.6)
    .series(BarSeries::new(&mx.savings_usd_bn, Paint::slot(0)).label("Ahorro anual (USD bn)"))
    .overlay(LineOverlay {
        label: Some("Δ PIB (%)".to_string()),
        values: mx.delta_gdp_pct.iter().map(|v| Some(*v)).collect(),
        paint: Paint::slot(1),
    })
    .secondary_axis(
        ValueAxis::new(
            "Contribución adicional al crecimiento del PIB (%)",
            0.0,
            headroom(max_value(&mx.delta_gdp_pct), DEFAULT_HEADROOM),
        )
        .without_grid(),
    );

    let mut figure = Figure::new(
        exhibit.id,
        exhibit.file_stem,
        "Exhibit 8: Caso de Negocio en México – Ahorros, Crecimiento y Usuarios (5 años)",
        (10.0, 6.0),
        Body::Bars(chart),
    )
    .legend(LegendPosition::UpperLeft)
    .footnote(
        "Fuente: Tabla 4 (proyección México a 5 años) – ahorros anuales (USD), ΔPIB (%), \
         nuevos usuarios acumulados.",
    );

    for (i, (saving, users)) in mx.savings_usd_bn.iter().zip(mx.new_users_m.iter()).enumerate() {
        figure = figure.annotate(
            Annotation::text(
                format!("{:.0} M", users),
                Anchor::Data(i as f64, saving + savings_max * 0.04),
            )
            .size(10.0),
        );
    }

    Ok(figure)
}

fn annual_savings(exhibit: &Exhibit, data: &Dataset) -> Result<Figure> {
    let mx = &data.mexico;
    let savings = &mx.savings_usd_bn;
    let top = max_value(savings);
    let last = savings.len() - 1;

    let chart = BarChart::vertical(
        year_labels(&mx.years),
        ValueAxis::new("Ahorro anual (USD bn)", 0.0, headroom(top, DEFAULT_HEADROOM)),
    )
    .category_desc(YEARS_SINCE_LAUNCH)
    .series(BarSeries::new(savings, Paint::slot(0)).value_format(ValueFormat::Fixed(1)));

    Ok(Figure::new(
        exhibit.id,
        exhibit.file_stem,
        "Exhibit 9.1 — Ahorros Anuales Estimados (USD miles de millones)",
        (9.0, 6.0),
        Body::Bars(chart),
    )
    .title_pt(12.0)
    .annotate(
        Annotation::text(
            format!("Acumulado 5 años ≈ ${:.1} bn", cumulative(savings)),
            Anchor::Data(1.0, top * 0.95),
        )
        .boxed()
        .arrow_to(Anchor::Data(last as f64, savings[last])),
    )
    .footnote(TABLE4_SOURCE))
}

fn gdp_contribution(exhibit: &Exhibit, data: &Dataset) -> Result<Figure> {
    let mx = &data.mexico;
    let delta = &mx.delta_gdp_pct;
    let top = max_value(delta);
    let last = delta.len() - 1;
    let gdp = &data.brazil_gdp;

    let chart = BarChart::vertical(
        year_labels(&mx.years),
        ValueAxis::new("Δ PIB (%)", 0.0, headroom(top, DEFAULT_HEADROOM)),
    )
    .category_desc(YEARS_SINCE_LAUNCH)
    .series(BarSeries::new(delta, Paint::slot(0)).value_format(ValueFormat::Percent(2)));

    Ok(Figure::new(
        exhibit.id,
        exhibit.file_stem,
        "Exhibit 9.2 — Contribución Adicional al Crecimiento del PIB (%)",
        (9.0, 6.0),
        Body::Bars(chart),
    )
    .title_pt(12.0)
    .annotate(
        Annotation::text(
            format!(
                "Benchmark Brasil (ACI/Cebr):\n≈ {:.2}% del PIB ({})",
                gdp.pct_of_gdp, gdp.pct_year
            ),
            Anchor::Data(1.0, top * 0.95),
        )
        .boxed()
        .arrow_to(Anchor::Data(last as f64, delta[last])),
    )
    .footnote(format!(
        "{} Validación externa: ACI Worldwide & Cebr (2022).",
        TABLE4_SOURCE
    )))
}

fn new_users(exhibit: &Exhibit, data: &Dataset) -> Result<Figure> {
    let mx = &data.mexico;

    let chart = BarChart::vertical(
        year_labels(&mx.years),
        ValueAxis::new(
            "Millones de personas",
            0.0,
            headroom(max_value(&mx.new_users_m), DEFAULT_HEADROOM),
        ),
    )
    .category_desc(YEARS_SINCE_LAUNCH)
    .series(BarSeries::new(&mx.new_users_m, Paint::slot(0)).value_format(ValueFormat::Millions(0)));

    Ok(Figure::new(
        exhibit.id,
        exhibit.file_stem,
        "Exhibit 9.3 — Nuevos Individuos Incorporados al Sistema Financiero (Millones)",
        (9.0, 6.0),
        Body::Bars(chart),
    )
    .title_pt(12.0)
    .footnote(TABLE4_SOURCE))
}

fn point_at(series: &AdoptionSeries, month: f64) -> Option<(f64, f64)> {
    series.points.iter().copied().find(|p| p.0 == month)
}

fn adoption_trajectories(exhibit: &Exhibit, data: &Dataset) -> Result<Figure> {
    let pix = &data.pix_adoption;
    let codi = &data.codi_adoption;
    let pix_paint = Paint::brand(2, PIX_GREEN);
    let codi_paint = Paint::brand(0, CODI_BLUE);

    let last_month = pix
        .points
        .iter()
        .chain(codi.points.iter())
        .map(|p| p.0)
        .fold(0.0, f64::max);

    let chart = LineChart {
        x_axis: ValueAxis::new("Meses desde el Lanzamiento", 0.0, last_month),
        x_ticks: vec![0.0, 6.0, 12.0, 24.0, 36.0, 48.0]
            .into_iter()
            .filter(|m| *m <= last_month)
            .collect(),
        y_axis: ValueAxis::new("Usuarios Activos (Millones)", 0.0, 170.0),
        series: vec![
            LineSeries {
                label: pix.label.to_string(),
                points: pix.points.to_vec(),
                paint: pix_paint,
                width_pt: 3.0,
            },
            LineSeries {
                label: codi.label.to_string(),
                points: codi.points.to_vec(),
                paint: codi_paint,
                width_pt: 2.5,
            },
        ],
    };

    let mut figure = Figure::new(
        exhibit.id,
        exhibit.file_stem,
        "Exhibit 10: Trayectorias de Adopción Divergentes – Usuarios Activos (en Millones) desde el Lanzamiento",
        (12.0, 7.0),
        Body::Lines(chart),
    )
    .legend(LegendPosition::UpperLeft);

    let callout = |text: String, at: (f64, f64), target: (f64, f64), paint: Paint| {
        Annotation::text(text, Anchor::Data(at.0, at.1))
            .align(Align::Left)
            .arrow_to(Anchor::Data(target.0, target.1))
            .boxed()
            .size(10.0)
            .paint(paint)
    };

    if let Some((m, u)) = point_at(pix, 24.0) {
        figure = figure.annotate(callout(
            format!("~{:.0} M en {:.0} meses", u, m),
            (m + 4.0, u - 13.0),
            (m, u),
            pix_paint,
        ));
    }
    if let Some(&(m, u)) = pix.points.last() {
        figure = figure.annotate(callout(
            format!("≈{:.1} M en {:.0} meses", u, m),
            (m - 15.0, u - 10.0),
            (m, u),
            pix_paint,
        ));
    }
    if let Some((m, u)) = point_at(codi, 6.0) {
        figure = figure.annotate(callout(
            format!("~{:.2} M ({:.0} meses)\nCoDi con ≥1 pago", u, m),
            (m + 4.0, 14.0),
            (m, u),
            codi_paint,
        ));
    }
    if let Some(&(m, u)) = codi.points.last() {
        figure = figure.annotate(callout(
            format!("≤{:.1} M ({:.0} meses)\nCoDi con ≥1 pago", u, m),
            (m - 18.0, 24.0),
            (m, u),
            codi_paint,
        ));
    }

    Ok(figure
        .footnote(
            "Brecha: Pix alcanza decenas de millones en 6–12 meses; \
             CoDi suma ≤1.6 M en 48 meses (usuarios con ≥1 pago).",
        )
        .footnote(
            "Fuente: BCB, Relatório de Gestão do Pix 2023 (Gráfico 3.3.1); FEBRABAN (nov-2024) \
             sobre 160.5 M personas; BBVA Research (ene-2024) con datos de Banxico sobre CoDi \
             (18.6 M cuentas validadas; 1.6 M con ≥1 pago); Banxico IAMF 2024 sobre DiMo.",
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_and_stems_are_unique() {
        let ids: HashSet<&str> = catalog().iter().map(|e| e.id).collect();
        let stems: HashSet<&str> = catalog().iter().map(|e| e.file_stem).collect();
        assert_eq!(ids.len(), catalog().len());
        assert_eq!(stems.len(), catalog().len());
    }

    #[test]
    fn test_every_builder_succeeds() {
        let data = Dataset::default();
        for exhibit in catalog() {
            let figure = exhibit.build(&data).unwrap();
            assert_eq!(figure.id, exhibit.id);
            assert_eq!(figure.file_stem, exhibit.file_stem);
            assert!(!figure.title.is_empty());
            assert!(figure.size_in.0 > 0.0 && figure.size_in.1 > 0.0);
        }
    }

    #[test]
    fn test_bar_series_match_categories() {
        let data = Dataset::default();
        for exhibit in catalog() {
            if let Body::Bars(chart) = exhibit.build(&data).unwrap().body {
                for series in &chart.series {
                    assert_eq!(series.values.len(), chart.categories.len(), "{}", exhibit.id);
                }
                if let Some(overlay) = &chart.overlay {
                    assert_eq!(overlay.values.len(), chart.categories.len(), "{}", exhibit.id);
                }
            }
        }
    }

    #[test]
    fn test_select() {
        let all = select::<&str>(&[]).unwrap();
        assert_eq!(all.len(), 16);

        // Catalogue order, duplicates collapsed
        let some = select(&["10", "9.1", "10"]).unwrap();
        let ids: Vec<&str> = some.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["9.1", "10"]);

        match select(&["9.1", "8.1"]) {
            Err(ExhibitError::UnknownExhibit(id)) => assert_eq!(id, "8.1"),
            other => panic!("expected UnknownExhibit, got {:?}", other.map(|v| v.len())),
        }
    }

    #[test]
    fn test_conversion_callouts() {
        let figure = find("1").unwrap().build(&Dataset::default()).unwrap();
        let texts: Vec<&str> = figure.annotations.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["Tasa de Conversión: 33.7%", "Tasa de Conversión: 36.8%"]
        );
    }

    #[test]
    fn test_ratio_callout() {
        let figure = find("2").unwrap().build(&Dataset::default()).unwrap();
        assert_eq!(figure.annotations[0].text, "≈ 23×");
    }

    #[test]
    fn test_sme_callout_text() {
        let figure = find("3").unwrap().build(&Dataset::default()).unwrap();
        let text = &figure.annotations[0].text;
        assert!(text.contains("$200,000 MXN/mes"));
        assert!(text.contains("2.5% → 0.22%"));
        assert!(text.contains("≈ $4,560 MXN/mes"));
        assert!(text.contains("≈ $54,720 MXN/año"));
    }

    #[test]
    fn test_cumulative_callout() {
        let figure = find("9.1").unwrap().build(&Dataset::default()).unwrap();
        assert_eq!(figure.annotations[0].text, "Acumulado 5 años ≈ $20.5 bn");

        let figure = find("9.2").unwrap().build(&Dataset::default()).unwrap();
        assert!(figure.annotations[0].text.contains("≈ 2.08% del PIB (2026)"));
    }

    #[test]
    fn test_digital_dividend_panels() {
        let figure = find("4").unwrap().build(&Dataset::default()).unwrap();
        match figure.body {
            Body::Callouts(panels) => {
                assert_eq!(panels[0].lines[0].0, "$21 Mil Millones USD");
                assert_eq!(
                    panels[1].lines[0].0,
                    "Proyección 2030: R$40.1 Mil Millones / año"
                );
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_scorecard_statuses() {
        let figure = find("7").unwrap().build(&Dataset::default()).unwrap();
        match figure.body {
            Body::Scorecard(table) => {
                assert_eq!(table.rows.len(), 5);
                assert_eq!(table.columns.len(), 2);
                assert!(table.cells.iter().all(|row| row[0] == PillarStatus::Met.slot()));
                let mexico: Vec<usize> = table.cells.iter().map(|row| row[1]).collect();
                assert_eq!(mexico, vec![1, 1, 0, 0, 1]);
                assert_eq!(table.legend.len(), 3);
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_transaction_gap_has_ratio_and_no_footnotes() {
        let figure = find("2").unwrap().build(&Dataset::default()).unwrap();
        assert_eq!(figure.annotations.len(), 1);
        assert_eq!(figure.annotations[0].text, "≈ 23×");
        assert!(figure.footnotes.is_empty());
    }

    #[test]
    fn test_trajectory_callouts() {
        let figure = find("10").unwrap().build(&Dataset::default()).unwrap();
        let texts: Vec<&str> = figure.annotations.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(texts[0], "~133 M en 24 meses");
        assert_eq!(texts[1], "≈160.5 M en 48 meses");
        assert!(texts[2].starts_with("~0.11 M (6 meses)"));
        assert!(texts[3].starts_with("≤1.6 M (48 meses)"));
        assert_eq!(figure.footnotes.len(), 2);
    }

    #[test]
    fn test_builders_follow_the_data() {
        let mut data = Dataset::default();
        data.mexico.savings_usd_bn = [1.0, 1.0, 1.0, 1.0, 1.0];
        let figure = find("9.1").unwrap().build(&data).unwrap();
        assert_eq!(figure.annotations[0].text, "Acumulado 5 años ≈ $5.0 bn");
    }
}
