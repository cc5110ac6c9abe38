use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::config::ClinicProfile;
use crate::models::schedule::weekday_label;
use crate::models::{AppointmentSummary, AvailabilityLevel, DayAvailability, Service};

const CODE_EXAMPLE: &str = "MC20241220145230";

fn fmt_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn fmt_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

pub fn service_lines(services: &[Service]) -> String {
    services
        .iter()
        .map(|s| {
            let icon = if s.name.eq_ignore_ascii_case("laboratorio") {
                "🧪"
            } else {
                "✨"
            };
            format!(
                "{icon} **{}** - ${:.0} MXN ({} min) - {}",
                s.name, s.price, s.duration_minutes, s.doctor_name
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn outlook(days: &[DayAvailability]) -> String {
    let lines: Vec<String> = days
        .iter()
        .map(|day| {
            let status = match day.level() {
                AvailabilityLevel::Good => format!("✅ {} horarios disponibles", day.open_slots),
                AvailabilityLevel::Limited => {
                    format!("⚠️ Solo {} horarios disponibles", day.open_slots)
                }
                AvailabilityLevel::None => "❌ Sin disponibilidad".to_string(),
            };
            format!(
                "• **{}** ({}): {status}",
                weekday_label(day.weekday),
                day.date.format("%d/%m")
            )
        })
        .collect();

    format!("📅 **DISPONIBILIDAD PRÓXIMOS DÍAS:**\n\n{}", lines.join("\n"))
}

pub fn outlook_unavailable() -> String {
    "📅 **DISPONIBILIDAD:** consulta los horarios disponibles con recepción.".to_string()
}

pub fn welcome(clinic: &ClinicProfile) -> String {
    format!(
        "¡Bienvenido al asistente de citas de {}! 🏥\n\n\
         Puedo agendar, buscar, cancelar o cambiar tu cita, darte precios, \
         horarios y datos de emergencia.\n\n\
         **💡 Ejemplos:**\n\
         - \"Juan Pérez, 3312345678, consulta general, viernes\"\n\
         - \"¿Cuánto cuesta una consulta de pediatría?\"\n\
         - \"Cancelar cita {CODE_EXAMPLE}\"\n\
         - \"Cambiar cita {CODE_EXAMPLE} para el miércoles\"\n\n\
         ¿En qué puedo ayudarte hoy?",
        clinic.name
    )
}

pub fn greeting(clinic: &ClinicProfile) -> String {
    format!(
        "👋 **¡Hola! Bienvenido a {}**\n\n\
         **Puedo ayudarte a:**\n\
         • 📅 Agendar citas\n\
         • 🔍 Buscar tus citas por nombre o teléfono\n\
         • ❌ Cancelar citas con tu número de confirmación\n\
         • 🔄 Cambiar o reagendar citas\n\
         • 💰 Consultar precios\n\
         • ⏰ Ver disponibilidad\n\
         • 🚨 Información de emergencias\n\n\
         **💡 Tip:** envíame nombre, teléfono, servicio y día en un solo mensaje \
         y agendo tu cita al instante.",
        clinic.name
    )
}

pub fn request_change() -> String {
    format!(
        "📅 **CAMBIAR/REAGENDAR CITA**\n\n\
         Necesito tu **número de confirmación** (formato {CODE_EXAMPLE}).\n\n\
         **💡 Ejemplos:**\n\
         • \"Cambiar cita {CODE_EXAMPLE} para el miércoles\"\n\
         • \"Reagendar {CODE_EXAMPLE} al viernes\"\n\n\
         ¿No tienes el número? Puedo buscar tu cita por nombre o teléfono."
    )
}

pub fn change_needs_code() -> String {
    format!(
        "❌ **CAMBIAR CITA**\n\n\
         Para cambiar una cita necesito el **número de confirmación** \
         (formato {CODE_EXAMPLE}).\n\n\
         **💡 Ejemplo:** \"Cambiar cita {CODE_EXAMPLE} para el miércoles\""
    )
}

pub fn change_needs_day(code: &str, outlook: &str) -> String {
    format!(
        "📅 **CAMBIAR CITA: {code}**\n\n\
         ¿A qué día quieres moverla?\n\n\
         {outlook}\n\n\
         **💡 Ejemplo:** \"Mover {code} para el viernes\""
    )
}

pub fn change_no_availability(day: Weekday, outlook: &str) -> String {
    format!(
        "❌ **SIN DISPONIBILIDAD PARA EL {}**\n\n{outlook}\n\n¿Te parece bien otro día?",
        weekday_label(day).to_uppercase()
    )
}

pub fn change_confirmed(code: &str, day: Weekday, date: NaiveDate, time: NaiveTime) -> String {
    format!(
        "✅ **CITA CAMBIADA**\n\n\
         🆔 **Confirmación:** {code}\n\
         🗓️ **Nuevo día:** {}\n\
         📅 **Nueva fecha:** {}\n\
         ⏰ **Nueva hora:** {}\n\n\
         Tu número de confirmación sigue siendo el mismo. \
         Llega 15 minutos antes de tu cita.",
        weekday_label(day),
        fmt_date(date),
        fmt_time(time)
    )
}

pub fn request_cancellation() -> String {
    format!(
        "❌ **CANCELAR CITA**\n\n\
         Necesito el **número de confirmación** que recibiste al agendar \
         (formato {CODE_EXAMPLE}).\n\n\
         Si no lo tienes, dime tu nombre completo o tu teléfono y busco tu cita.\n\n\
         **Ejemplo:** \"Cancelar cita {CODE_EXAMPLE}\""
    )
}

pub fn cancel_succeeded(code: &str, at: NaiveDateTime) -> String {
    format!(
        "✅ **CITA CANCELADA**\n\n\
         📋 **Confirmación:** {code}\n\
         📅 **Fecha de cancelación:** {}\n\n\
         ¿Deseas agendar una nueva cita?",
        at.format("%d/%m/%Y %H:%M")
    )
}

pub fn cancel_failed(code: &str, reason: &str) -> String {
    format!(
        "❌ **NO SE PUDO CANCELAR**\n\n\
         🔍 **Número buscado:** {code}\n\
         ❌ **Motivo:** {reason}\n\n\
         Verifica que el número sea correcto y que la cita no se haya cancelado antes."
    )
}

pub fn search_instructions() -> String {
    format!(
        "🔍 **BUSCAR CITA**\n\n\
         **Opción 1, por nombre:** \"Buscar cita de Juan Pérez García\"\n\
         **Opción 2, por teléfono:** \"Buscar cita 3312345678\"\n\
         **Opción 3, por confirmación:** \"Mi cita es {CODE_EXAMPLE}\"\n\n\
         ¿Cuál prefieres usar?"
    )
}

pub fn search_results(results: &[AppointmentSummary]) -> String {
    let lines: Vec<String> = results
        .iter()
        .map(|r| {
            format!(
                "• **{}** - {} - {} {} - {} ({})",
                r.confirmation_code,
                r.patient_name,
                fmt_date(r.date),
                fmt_time(r.time),
                r.service_name,
                r.status.as_str()
            )
        })
        .collect();

    format!(
        "🔍 **CITAS ENCONTRADAS ({})**\n\n{}\n\n\
         Para cancelar o cambiar, usa el número de confirmación.",
        results.len(),
        lines.join("\n")
    )
}

pub fn search_not_found(searched: &str) -> String {
    format!(
        "🔍 No encontré citas activas para **{searched}**.\n\n{}",
        search_instructions()
    )
}

pub fn booking_menu(services: &[Service]) -> String {
    format!(
        "📅 **AGENDAR NUEVA CITA**\n\n\
         **Incluye en un solo mensaje:**\n\
         1. Nombre completo\n\
         2. Teléfono (10 dígitos)\n\
         3. Servicio\n\
         4. Día preferido (lunes, martes, etc.)\n\n\
         **🏥 SERVICIOS DISPONIBLES:**\n{}\n\n\
         **💡 Ejemplo:** \"María González López, 3312345678, pediatría, miércoles\"",
        service_lines(services)
    )
}

pub fn price_list(clinic: &ClinicProfile, services: &[Service]) -> String {
    let lines: Vec<String> = services
        .iter()
        .map(|s| format!("• **{}**: ${:.0} MXN", s.name, s.price))
        .collect();

    format!(
        "💰 **TARIFAS {}**\n\n{}\n\n\
         **💳 Formas de pago:** efectivo, tarjeta, transferencia y seguros médicos mayores.\n\n\
         ¿Listo para agendar? Dime el servicio que necesitas.",
        clinic.name.to_uppercase(),
        lines.join("\n")
    )
}

pub fn hours(outlook: &str) -> String {
    format!(
        "🕒 **HORARIOS Y DISPONIBILIDAD**\n\n\
         • **Lunes a Viernes:** 9:00 AM - 6:00 PM\n\
         • **Sábados:** 9:00 AM - 11:30 AM\n\
         • **Domingos:** solo emergencias\n\n\
         {outlook}\n\n\
         Citas cada 30 minutos. Llega 15 minutos antes."
    )
}

pub fn emergency(clinic: &ClinicProfile) -> String {
    format!(
        "🚨 **PROTOCOLO DE EMERGENCIAS**\n\n\
         **📞 Emergencias 24/7:** {}\n\
         📍 {}\n\n\
         1. Llama **inmediatamente** al número de emergencias\n\
         2. Acude al hospital más cercano si es necesario\n\n\
         **🚑 Números nacionales:** Cruz Roja 065 · Emergencias 911\n\n\
         ⚠️ Si es una emergencia real, no uses este chat. Llama directamente.",
        clinic.phone, clinic.address
    )
}

pub fn general_info(clinic: &ClinicProfile, services_count: usize) -> String {
    format!(
        "ℹ️ **{} - INFORMACIÓN GENERAL**\n\n\
         • {services_count} especialidades médicas disponibles\n\
         • Médicos certificados y seguimiento post-consulta\n\n\
         **💡 Puedes preguntarme:**\n\
         • \"¿Cuánto cuesta una consulta?\"\n\
         • \"¿Qué horarios tienen disponibles?\"\n\
         • \"Quiero agendar una cita\"\n\
         • \"Buscar mi cita\"",
        clinic.name.to_uppercase()
    )
}

pub fn booking_missing_name() -> String {
    "❌ No pude identificar el nombre completo. Por favor, escríbelo claramente.".to_string()
}

pub fn booking_missing_phone() -> String {
    "❌ No encontré un número de teléfono válido. Debe tener 10 dígitos.".to_string()
}

pub fn booking_missing_service(services: &[Service]) -> String {
    format!(
        "❌ **No identifiqué el servicio médico solicitado.**\n\n\
         **🏥 Servicios disponibles:**\n{}\n\n\
         Por favor indica cuál necesitas.",
        service_lines(services)
    )
}

pub fn booking_no_availability(day: Weekday, outlook: &str) -> String {
    format!(
        "❌ **Sin disponibilidad para el {}**\n\n{outlook}\n\n¿Te parece bien otro día?",
        weekday_label(day)
    )
}

pub fn booking_needs_day(name: &str, phone: &str, outlook: &str) -> String {
    format!(
        "📝 **Datos recibidos:**\n\n\
         ✅ **Nombre:** {name}\n\
         ✅ **Teléfono:** {phone}\n\
         ✅ **Servicio:** identificado\n\n\
         🗓️ **Falta el día preferido:**\n\n\
         {outlook}\n\n\
         Dime qué día prefieres y completo tu cita."
    )
}

pub struct BookingConfirmation<'a> {
    pub patient_name: &'a str,
    pub patient_phone: &'a str,
    pub service: &'a Service,
    pub weekday: Weekday,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub confirmation_code: &'a str,
}

pub fn booking_confirmed(clinic: &ClinicProfile, booking: &BookingConfirmation<'_>) -> String {
    format!(
        "✅ **¡CITA CONFIRMADA!**\n\n\
         👤 **Paciente:** {}\n\
         📞 **Teléfono:** {}\n\
         🏥 **Servicio:** {}\n\
         👨‍⚕️ **Médico:** {}\n\n\
         🗓️ **Día:** {}\n\
         📅 **Fecha:** {}\n\
         ⏰ **Hora:** {}\n\
         ⏱️ **Duración:** {} minutos\n\
         💰 **Costo:** ${:.0} MXN\n\n\
         **🆔 NÚMERO DE CONFIRMACIÓN:** **{}**\n\n\
         📍 {}, {}\n\
         Llega 15 minutos antes y trae identificación oficial. \
         Para cancelar usa tu número de confirmación.\n\
         📞 ¿Dudas? {}",
        booking.patient_name,
        booking.patient_phone,
        booking.service.name,
        booking.service.doctor_name,
        weekday_label(booking.weekday),
        fmt_date(booking.date),
        fmt_time(booking.time),
        booking.service.duration_minutes,
        booking.service.price,
        booking.confirmation_code,
        clinic.name,
        clinic.address,
        clinic.phone
    )
}

pub fn booking_failed(reason: &str) -> String {
    format!("❌ **Error al agendar la cita:** {reason}")
}

pub fn booking_slot_taken(date: NaiveDate, time: NaiveTime) -> String {
    format!(
        "❌ El horario {} del {} acaba de ocuparse. Envía de nuevo tu mensaje \
         y te asigno el siguiente disponible.",
        fmt_time(time),
        fmt_date(date)
    )
}

pub fn apology() -> String {
    "❌ **Error procesando tu solicitud**\n\n\
     Por favor, intenta nuevamente o reformula tu mensaje.\n\n\
     **¿Puedo ayudarte con algo como:**\n\
     • Agendar una cita\n\
     • Consultar precios\n\
     • Ver horarios disponibles"
        .to_string()
}
