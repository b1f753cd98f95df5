//! Plain-text output for the CLI commands.

use chrono::{Local, NaiveDate};

use queuedesk_core::models::{
    Appointment, AppointmentAction, CreatedAppointment, Department, Overview, QueueItem,
    QueueSummary, User,
};
use queuedesk_core::utils::{format_header_date, format_timestamp, truncate};

const ID_WIDTH: usize = 24;
const NAME_WIDTH: usize = 32;

pub fn print_user(user: &User) {
    println!("{}", user.display());
    println!("  id:   {}", user.id);
    println!("  role: {}", user.role);
}

pub fn print_departments(departments: &[Department]) {
    if departments.is_empty() {
        println!("No departments");
        return;
    }
    println!("{:<idw$}  {}", "ID", "NAME", idw = ID_WIDTH);
    for department in departments {
        println!(
            "{:<idw$}  {}",
            truncate(&department.id, ID_WIDTH),
            truncate(&department.name, NAME_WIDTH),
            idw = ID_WIDTH
        );
    }
}

fn print_queue_rows(items: &[QueueItem]) {
    println!(
        "{:>4}  {:<8}  {:<idw$}  {}",
        "#", "STATUS", "APPOINTMENT", "JOINED",
        idw = ID_WIDTH
    );
    for item in items {
        println!(
            "{:>4}  {:<8}  {:<idw$}  {}",
            item.position,
            item.status.to_string(),
            truncate(&item.appointment_id, ID_WIDTH),
            format_timestamp(&item.created_at),
            idw = ID_WIDTH
        );
    }
}

pub fn print_queue(summary: &QueueSummary) {
    println!("{}", summary.headline());
    if summary.items.is_empty() {
        println!("Queue is empty");
        return;
    }
    print_queue_rows(&summary.items);
}

pub fn print_overview(overview: &Overview, date: &str) {
    let header = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .unwrap_or_else(|_| Local::now().date_naive());
    println!("Overview - {}", format_header_date(header));
    println!("  Departments:          {}", overview.departments_count());
    println!("  Today's appointments: {}", overview.todays_appointments());

    println!();
    let label = overview.department.as_ref().map(|d| d.name.as_str());
    if label.is_none() && overview.departments.is_empty() {
        println!("No departments yet");
        return;
    }
    println!("{} - {}", label.unwrap_or("Queue"), overview.queue.headline());
    if overview.preview().is_empty() {
        println!("Queue is empty");
    } else {
        print_queue_rows(overview.preview());
        let hidden = overview.queue.total() - overview.preview().len();
        if hidden > 0 {
            println!("  ... and {} more", hidden);
        }
    }
}

pub fn print_appointments(appointments: &[Appointment]) {
    if appointments.is_empty() {
        println!("No appointments");
        return;
    }
    println!(
        "{:<idw$}  {:<10}  {:<5}  {:<9}  {}",
        "ID", "DATE", "TIME", "STATUS", "DEPARTMENT",
        idw = ID_WIDTH
    );
    for appointment in appointments {
        println!(
            "{:<idw$}  {:<10}  {:<5}  {:<9}  {}",
            truncate(&appointment.id, ID_WIDTH),
            appointment.date,
            appointment.time,
            appointment.status.to_string(),
            truncate(&appointment.department_id, ID_WIDTH),
            idw = ID_WIDTH
        );
    }
}

pub fn print_appointment_action(action: &AppointmentAction) {
    println!("{} ({}: {})", action.message, action.appointment_id, action.status);
}

pub fn print_created_appointment(created: &CreatedAppointment) {
    println!(
        "Booked {} for {} - {}, queue position #{}",
        created.appointment_id,
        format_timestamp(&created.scheduled_at),
        created.status,
        created.queue.position
    );
}
